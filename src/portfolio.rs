//! Static portfolio content served to the front-end.
//!
//! DESIGN
//! ======
//! The site is a single page split into named sections. Everything shown on
//! it (profile, skills, experience, education, projects, blog posts) is
//! compiled in as `'static` tables so the server never touches disk or a
//! database for content. Project cards are enriched at request time by
//! `services::github`; the tables here carry only what never changes.

use serde::{Deserialize, Serialize};

// =============================================================================
// SECTIONS
// =============================================================================

/// A navigable page section. The id doubles as the DOM anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Home,
    About,
    Projects,
    Blog,
    Contact,
}

impl Section {
    /// All sections in navbar order.
    pub const ALL: [Section; 5] = [Section::Home, Section::About, Section::Projects, Section::Blog, Section::Contact];

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::About => "about",
            Self::Projects => "projects",
            Self::Blog => "blog",
            Self::Contact => "contact",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::About => "About",
            Self::Projects => "Projects",
            Self::Blog => "Blog",
            Self::Contact => "Contact",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NavLink {
    pub id: &'static str,
    pub label: &'static str,
}

// =============================================================================
// CONTENT TYPES
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub name: &'static str,
    pub headline: &'static str,
    pub email: &'static str,
    pub location: &'static str,
    pub linkedin_url: &'static str,
    pub github_url: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Technical,
    Data,
    Tools,
    Soft,
}

#[derive(Debug, Clone, Serialize)]
pub struct Skill {
    pub name: &'static str,
    /// Self-assessed, 1 to 10.
    pub level: u8,
    pub category: SkillCategory,
}

#[derive(Debug, Clone, Serialize)]
pub struct Experience {
    pub title: &'static str,
    pub company: &'static str,
    pub duration: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Education {
    pub degree: &'static str,
    pub institution: &'static str,
    pub duration: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub title: &'static str,
    pub description: &'static str,
    pub image: &'static str,
    pub tags: &'static [&'static str],
    pub accuracy: Option<&'static str>,
    pub demo: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlogPost {
    pub title: &'static str,
    pub excerpt: &'static str,
    pub date: &'static str,
    pub read_time: &'static str,
    pub image: &'static str,
    pub url: &'static str,
    pub category: &'static str,
}

/// Everything `/api/portfolio` returns, borrowed from the static tables.
#[derive(Debug, Serialize)]
pub struct Portfolio {
    pub profile: &'static Profile,
    pub sections: Vec<NavLink>,
    pub skills: &'static [Skill],
    pub experience: &'static [Experience],
    pub education: &'static [Education],
    pub projects: &'static [Project],
    pub blog: &'static [BlogPost],
}

#[must_use]
pub fn portfolio() -> Portfolio {
    Portfolio {
        profile: &PROFILE,
        sections: Section::ALL
            .into_iter()
            .map(|s| NavLink { id: s.id(), label: s.label() })
            .collect(),
        skills: SKILLS,
        experience: EXPERIENCE,
        education: EDUCATION,
        projects: PROJECTS,
        blog: BLOG_POSTS,
    }
}

// =============================================================================
// TABLES
// =============================================================================

pub static PROFILE: Profile = Profile {
    name: "Shayoun Bhaduri",
    headline: "MBA (Data Science & AI) at IIT Mandi",
    email: "mb24043@students.iitmandi.ac.in",
    location: "IIT Mandi, Himachal Pradesh, India",
    linkedin_url: "https://linkedin.com/in/shayoun-bhaduri",
    github_url: "https://github.com/bhadurishayoun",
};

pub static SKILLS: &[Skill] = &[
    Skill { name: "Python", level: 9, category: SkillCategory::Technical },
    Skill { name: "Machine Learning", level: 8, category: SkillCategory::Technical },
    Skill { name: "SQL", level: 8, category: SkillCategory::Technical },
    Skill { name: "EDA", level: 9, category: SkillCategory::Data },
    Skill { name: "Power BI", level: 8, category: SkillCategory::Tools },
    Skill { name: "Agile", level: 7, category: SkillCategory::Soft },
    Skill { name: "Jira", level: 7, category: SkillCategory::Tools },
    Skill { name: "IBM Cloud", level: 6, category: SkillCategory::Tools },
    Skill { name: "Hadoop", level: 6, category: SkillCategory::Technical },
    Skill { name: "Data Visualization", level: 9, category: SkillCategory::Data },
];

pub static EXPERIENCE: &[Experience] = &[
    Experience {
        title: "Founder's Office Intern",
        company: "Pync",
        duration: "Nov 2024 - Present",
        description: "Providing product insights and driving strategic changes in a startup environment.",
    },
    Experience {
        title: "Summer Research Intern",
        company: "IIT BHU",
        duration: "May 2023 - Jul 2023",
        description: "Worked on deep learning models for person re-identification and privacy protection.",
    },
    Experience {
        title: "Data Analytics Intern",
        company: "GUESSS India",
        duration: "Oct 2024 - Present",
        description: "Leveraging Power BI and Tableau for insightful analytics.",
    },
];

pub static EDUCATION: &[Education] = &[
    Education {
        degree: "MBA (Data Science & AI)",
        institution: "IIT Mandi",
        duration: "2024 - Present",
        description: "Focusing on advanced AI applications in business contexts.",
    },
    Education {
        degree: "BTech (Data Science & AI)",
        institution: "SRM University, Lucknow",
        duration: "2020 - 2024",
        description: "Specialized in machine learning and data engineering.",
    },
];

pub static PROJECTS: &[Project] = &[
    Project {
        title: "Student Gap Analysis",
        description: "Used regression models to identify academic performance gaps and provide targeted interventions for students.",
        image: "https://images.unsplash.com/photo-1501504905252-473c47e087f8?auto=format&fit=crop&w=800&q=80",
        tags: &["Regression", "Python", "Data Analysis", "Education"],
        accuracy: Some("92% accuracy"),
        demo: None,
    },
    Project {
        title: "Face Recognition of Partially Occluded Objects",
        description: "Developed a facial recognition system that can identify individuals even when parts of their face are obscured.",
        image: "https://images.unsplash.com/photo-1587918584555-438e9a9f8942?auto=format&fit=crop&w=800&q=80",
        tags: &["Computer Vision", "Deep Learning", "CNN", "OpenCV"],
        accuracy: Some("98.93% accuracy"),
        demo: None,
    },
    Project {
        title: "Weather Forecasting",
        description: "Developed a random forest-based prediction model for accurate weather forecasting across different regions.",
        image: "https://images.unsplash.com/photo-1504608524841-42fe6f032b4b?auto=format&fit=crop&w=800&q=80",
        tags: &["Random Forest", "Time Series", "Pandas", "Data Visualization"],
        accuracy: Some("95% accuracy"),
        demo: None,
    },
    Project {
        title: "Diversity Inclusion Dashboard",
        description: "Analyzed HR data to uncover gender balance challenges in executive management and create visual insights.",
        image: "https://images.unsplash.com/photo-1551836022-d5d88e9218df?auto=format&fit=crop&w=800&q=80",
        tags: &["Power BI", "HR Analytics", "Dashboard", "Data Visualization"],
        accuracy: None,
        demo: Some("https://example.com/diversity-dashboard"),
    },
    Project {
        title: "Virtual Assistant Chatbot",
        description: "Designed a chatbot using Python and ML to enhance productivity and automate routine tasks.",
        image: "https://images.unsplash.com/photo-1531746790731-6c087fecd65a?auto=format&fit=crop&w=800&q=80",
        tags: &["NLP", "Python", "Machine Learning", "Chatbot"],
        accuracy: None,
        demo: None,
    },
];

pub static BLOG_POSTS: &[BlogPost] = &[
    BlogPost {
        title: "AI-driven Fraud Detection Models: A Comprehensive Guide",
        excerpt: "Learn how machine learning models can be leveraged to detect and prevent financial fraud with high accuracy rates.",
        date: "April 15, 2024",
        read_time: "8 min read",
        image: "https://images.unsplash.com/photo-1563013544-824ae1b704d3?auto=format&fit=crop&w=800&q=80",
        url: "#",
        category: "AI",
    },
    BlogPost {
        title: "Power BI vs. Tableau: Data Visualization for Decision Making",
        excerpt: "A comparative analysis of two leading data visualization tools and their impact on business decision-making processes.",
        date: "March 22, 2024",
        read_time: "6 min read",
        image: "https://images.unsplash.com/photo-1543286386-713bdd548da4?auto=format&fit=crop&w=800&q=80",
        url: "#",
        category: "Data Visualization",
    },
    BlogPost {
        title: "Business Analytics Case Study: Retail Optimization with Machine Learning",
        excerpt: "How a retail chain improved inventory management and sales forecasting using predictive analytics models.",
        date: "February 10, 2024",
        read_time: "10 min read",
        image: "https://images.unsplash.com/photo-1582481946466-8c2247da81c9?auto=format&fit=crop&w=800&q=80",
        url: "#",
        category: "Business Analytics",
    },
];

#[cfg(test)]
#[path = "portfolio_test.rs"]
mod tests;
