//! Intent responder: the keyword table behind the chat assistant.
//!
//! DESIGN
//! ======
//! `respond` lower-cases the input and walks `RULES` in declaration order.
//! A rule fires when any of its keywords is a substring of the input; the
//! first rule to fire wins. Matching is containment, not word matching, so
//! `"tech"` fires on `"fintech"` and `"hi"` fires on `"this"`.
//!
//! ORDERING
//! ========
//! Declaration order is the only priority policy. Navigation rules come
//! first because their phrases are specific. The greeting rule comes after
//! the topical rules: its two-letter keyword hides inside common words
//! ("his", "which") and would otherwise swallow real questions.

use serde::{Deserialize, Serialize};

use crate::portfolio::Section;

/// Returned when no rule fires.
pub const FALLBACK: &str = "I'm not sure I understand. Would you like to know about Shayoun's experience, \
education, skills, projects, or how to contact him?";

/// First bot message of every conversation.
pub const GREETING: &str = "Hi there! I'm Shayoun's AI assistant. How can I help you today?";

// =============================================================================
// TYPES
// =============================================================================

/// Instruction for the presentation layer, carried alongside a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Scroll the page to the given section.
    Navigate { target: Section },
}

/// One row of the keyword table.
#[derive(Debug)]
pub struct IntentRule {
    /// Lowercase trigger phrases; any one of them is enough.
    pub keywords: &'static [&'static str],
    pub response: &'static str,
    pub action: Option<Action>,
}

impl IntentRule {
    const fn reply(keywords: &'static [&'static str], response: &'static str) -> Self {
        Self { keywords, response, action: None }
    }

    const fn navigate(keywords: &'static [&'static str], response: &'static str, target: Section) -> Self {
        Self { keywords, response, action: Some(Action::Navigate { target }) }
    }

    /// `lowered` must already be lower-cased.
    #[must_use]
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

/// What `respond` hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub text: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
}

// =============================================================================
// RULE TABLE
// =============================================================================

pub static RULES: &[IntentRule] = &[
    IntentRule::navigate(
        &["go home", "take me home", "back to top"],
        "Taking you back to the top of the page.",
        Section::Home,
    ),
    IntentRule::navigate(
        &["go to about", "take me to about", "open about", "show about"],
        "Here's the About section with Shayoun's background, skills, and experience.",
        Section::About,
    ),
    IntentRule::navigate(
        &["go to projects", "take me to projects", "open projects", "show projects", "show me projects"],
        "Here are Shayoun's projects.",
        Section::Projects,
    ),
    IntentRule::navigate(
        &["go to blog", "take me to blog", "open blog", "show blog"],
        "Here are Shayoun's latest blog posts.",
        Section::Blog,
    ),
    IntentRule::navigate(
        &["go to contact", "take me to contact", "open contact", "contact form"],
        "Here's how you can get in touch with Shayoun.",
        Section::Contact,
    ),
    IntentRule::reply(
        &["experience", "work", "job", "internship"],
        "Shayoun has experience as a Founder's Office Intern at Pync, a Summer Research Intern at IIT BHU, \
and a Data Analytics Intern at GUESSS India. Would you like to know more about a specific role?",
    ),
    IntentRule::reply(
        &["education", "study", "degree", "university", "college"],
        "Shayoun is currently pursuing an MBA with a focus on Data Science & AI at IIT Mandi. He holds a BTech \
in Data Science & AI from SRM University, Lucknow. Is there something specific about his academic background \
you'd like to know?",
    ),
    IntentRule::reply(
        &["skills", "tech", "programming"],
        "Shayoun is skilled in Python, Machine Learning, SQL, EDA, Power BI, Agile, Jira, IBM Cloud, Hadoop, \
and Data Visualization. Which skill would you like to learn more about?",
    ),
    IntentRule::reply(
        &["project"],
        "Shayoun has worked on several projects including Student Gap Analysis, Face Recognition of Partially \
Occluded Objects, Weather Forecasting, Diversity Inclusion Dashboard, and a Virtual Assistant Chatbot. Would \
you like details on any of these?",
    ),
    IntentRule::reply(
        &["contact", "email", "connect", "reach"],
        "You can reach Shayoun via email at mb24043@students.iitmandi.ac.in or connect with him on LinkedIn \
(Shayoun Bhaduri) and GitHub (bhadurishayoun).",
    ),
    IntentRule::reply(
        &["blog", "article", "write"],
        "Shayoun writes about AI-driven fraud detection models, Power BI and data visualization, and business \
analytics case studies. Is there a specific topic you're interested in?",
    ),
    IntentRule::reply(
        &["thank"],
        "You're welcome! Feel free to ask if you have any other questions about Shayoun.",
    ),
    IntentRule::reply(
        &["hello", "hey", "hi"],
        "Hello! How can I help you learn more about Shayoun today?",
    ),
];

// =============================================================================
// LOOKUP
// =============================================================================

/// Index of the first rule that fires for `input`, if any.
#[must_use]
pub fn match_rule(input: &str) -> Option<usize> {
    let lowered = input.to_lowercase();
    RULES.iter().position(|rule| rule.matches(&lowered))
}

/// Answer free text with a canned reply.
///
/// Total over all strings. Callers filter blank input before asking.
#[must_use]
pub fn respond(input: &str) -> Reply {
    match match_rule(input) {
        Some(idx) => {
            let rule = &RULES[idx];
            Reply { text: rule.response, action: rule.action }
        }
        None => Reply { text: FALLBACK, action: None },
    }
}

#[cfg(test)]
#[path = "responder_test.rs"]
mod tests;
