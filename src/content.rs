//! Prompt construction and the deterministic mock content used whenever the
//! Dialogflow agent is unconfigured or fails.
//!
//! Everything here is pure string templating: same inputs, same output.

use crate::config::Prompts;
use crate::domain::Mode;
use crate::util::fill_template;

/// Instruction text for a mode, taken from the (possibly TOML-overridden) prompts.
pub fn instructions_for(prompts: &Prompts, mode: Mode) -> &str {
  match mode {
    Mode::Revision => &prompts.revision_instructions,
    Mode::Assessment => &prompts.assessment_instructions,
    Mode::Chat => &prompts.chat_instructions,
  }
}

/// Full prompt sent to the agent for an initial generation.
pub fn build_prompt(prompts: &Prompts, mode: Mode, subject: &str, chapter: &str, request: &str) -> String {
  fill_template(
    &prompts.prompt_template,
    &[
      ("mode", mode.as_str()),
      ("subject", subject),
      ("chapter", chapter),
      ("instructions", instructions_for(prompts, mode)),
      ("request", request),
    ],
  )
  .trim()
  .to_string()
}

/// Single-turn chat message with the session context embedded.
pub fn chat_context_message(prompts: &Prompts, mode: Mode, subject: &str, chapter: &str, message: &str) -> String {
  fill_template(
    &prompts.chat_context_template,
    &[("mode", mode.as_str()), ("subject", subject), ("chapter", chapter), ("message", message)],
  )
}

/// Request text used by `/api/ai/generate` when the caller sends none.
pub fn default_request(mode: Mode, subject: &str, chapter: &str) -> String {
  format!("Generate {} content for {} in {}", mode, chapter, subject)
}

/// Request text the wizard sends when it reaches the response view.
pub fn initial_request(mode: Mode, subject: &str, chapter: &str) -> String {
  match mode {
    Mode::Revision => format!(
      "Generate comprehensive revision notes for {chapter} in {subject}. Include key concepts, definitions, formulas, and important points."
    ),
    Mode::Assessment => format!(
      "Generate practice questions and problems for {chapter} in {subject}. Include MCQs, short answer questions, and problem-solving exercises."
    ),
    Mode::Chat => format!(
      "I want to learn about {chapter} in {subject}. Please provide an overview and let me know I can ask questions."
    ),
  }
}

const REVISION_TEMPLATE: &str = r#"# {chapter} - Revision Notes

## Key Concepts

### Introduction
{chapter} is a fundamental topic in {subject} that forms the basis for advanced concepts. Understanding this chapter is crucial for exam preparation.

### Important Definitions
• **Key Term 1**: A fundamental concept that describes the basic principles
• **Key Term 2**: An advanced concept building upon the basics
• **Key Term 3**: A practical application of the theoretical knowledge

### Main Topics

#### Topic 1: Fundamental Principles
The fundamental principles of {chapter} include several key aspects:
- Basic understanding of core concepts
- Relationship between different elements
- Practical applications in real-world scenarios

#### Topic 2: Advanced Concepts
Building upon the basics, we explore:
- Complex interactions and relationships
- Problem-solving techniques
- Common misconceptions to avoid

### Formulas and Equations
1. **Formula 1**: Basic equation for calculations
2. **Formula 2**: Advanced equation for complex problems
3. **Formula 3**: Practical application formula

### Important Points to Remember
✓ Always start with fundamental understanding
✓ Practice problems regularly
✓ Connect concepts to real-world examples
✓ Review formulas and their applications

### Common Exam Questions
This topic frequently appears in exams as:
- Conceptual understanding questions
- Problem-solving exercises
- Application-based scenarios

### Quick Revision Tips
1. Review key definitions daily
2. Practice numerical problems
3. Create concept maps
4. Solve previous year questions"#;

const ASSESSMENT_TEMPLATE: &str = r#"# {chapter} - Practice Assessment

## Multiple Choice Questions (MCQs)

**Question 1**: What is the primary concept in {chapter}?
A) Option A - Basic concept
B) Option B - Intermediate concept
C) Option C - Advanced concept
D) Option D - Application concept

**Correct Answer**: B
**Explanation**: The intermediate concept forms the foundation for understanding this topic.

---

**Question 2**: Which of the following is an application of {chapter}?
A) Real-world scenario 1
B) Real-world scenario 2
C) Real-world scenario 3
D) All of the above

**Correct Answer**: D
**Explanation**: All scenarios demonstrate practical applications.

---

**Question 3**: In {subject}, {chapter} is most closely related to:
A) Previous chapter concept
B) Current chapter focus
C) Future chapter preview
D) Unrelated concept

**Correct Answer**: B

---

## Short Answer Questions

**Question 4**: Define the key terms in {chapter} and explain their significance.
**Expected Answer**: Should include 3-4 key definitions with brief explanations and their importance in the subject.

---

**Question 5**: Explain the main principle of {chapter} with an example.
**Expected Answer**: Clear explanation of the principle followed by a relevant real-world or theoretical example.

---

## Problem-Solving Questions

**Question 6**:
Given: [Initial conditions related to {chapter}]
Find: [What needs to be calculated or proven]

**Solution Approach**:
1. Identify the given information
2. Apply relevant formula/concept
3. Calculate step by step
4. Verify the answer

---

**Question 7**: Application Problem
A practical scenario requires understanding of {chapter}. Solve the following:
[Problem statement]

**Hints**:
- Start with basic principles
- Use the formula correctly
- Check units and dimensions
- Verify the final answer

---

## Bonus Challenge Question

**Question 8**: Advanced Application
This question combines concepts from {chapter} with other topics in {subject}.
[Complex problem statement]

**Difficulty Level**: High
**Time Required**: 10-15 minutes
**Skills Tested**: Analytical thinking, concept integration, problem-solving"#;

const CHAT_TEMPLATE: &str = r#"Hello! I'm here to help you learn about **{chapter}** in {subject}.

This is an important topic that covers several key concepts. I can help you with:

✓ Understanding fundamental concepts
✓ Clarifying doubts and questions
✓ Explaining difficult topics
✓ Providing examples and applications
✓ Suggesting practice problems

**What would you like to know about {chapter}?**

Some common questions students ask:
• What are the basics I should know?
• Can you explain [specific concept]?
• How does this apply in real life?
• What are common mistakes to avoid?

Feel free to ask me anything related to this topic!"#;

/// Canned study document for a mode.
pub fn mock_content(mode: Mode, subject: &str, chapter: &str) -> String {
  let template = match mode {
    Mode::Revision => REVISION_TEMPLATE,
    Mode::Assessment => ASSESSMENT_TEMPLATE,
    Mode::Chat => CHAT_TEMPLATE,
  };
  fill_template(template, &[("chapter", chapter), ("subject", subject)])
}

/// One keyword rule for canned chat replies.
pub struct ChatRule {
  pub name: &'static str,
  pub keywords: &'static [&'static str],
  pub template: &'static str,
}

/// Evaluated top to bottom against the lower-cased message; first match wins.
pub const CHAT_RULES: &[ChatRule] = &[
  ChatRule {
    name: "formula",
    keywords: &["formula", "equation"],
    template: "Great question about formulas in {chapter}! Here are the key formulas you need to know:\n\n1. **Basic Formula**: [Formula description and when to use it]\n2. **Advanced Formula**: [Formula description and applications]\n\nWould you like me to explain how to apply any of these formulas with an example?",
  },
  ChatRule {
    name: "example",
    keywords: &["example", "explain"],
    template: "Let me explain that concept with a clear example:\n\nConsider this scenario in {subject}:\n[Detailed example explanation]\n\nThis demonstrates how the concept works in practice. Does this make sense? Would you like another example or have any questions?",
  },
  ChatRule {
    name: "comparison",
    keywords: &["difference", "compare"],
    template: "Excellent question! Let me clarify the differences:\n\n**Concept A:**\n• Characteristic 1\n• Characteristic 2\n• Use case\n\n**Concept B:**\n• Characteristic 1\n• Characteristic 2\n• Use case\n\nThe main distinction is... [explanation]\n\nIs there a specific aspect you'd like me to elaborate on?",
  },
  ChatRule {
    name: "reasoning",
    keywords: &["why", "how"],
    template: "That's a thoughtful question! Here's the reasoning:\n\n{chapter} works this way because:\n1. [Reason 1 with explanation]\n2. [Reason 2 with explanation]\n3. [Reason 3 with explanation]\n\nThis is important in {subject} because it helps us understand [application].\n\nDoes this answer your question, or would you like me to go deeper into any part?",
  },
];

const GENERIC_CHAT_TEMPLATE: &str = "Thank you for your question about {chapter}! Based on what you're asking, here's what you should know:\n\n{message} relates to several key concepts in this chapter. The fundamental idea is that [explanation relevant to the question].\n\nIn {subject}, this is particularly important because [significance].\n\nWould you like me to:\n• Provide more details about this concept\n• Give you a practical example\n• Explain related topics\n• Suggest practice problems\n\nWhat would be most helpful for you?";

/// First rule whose keyword occurs in the message (case-insensitive), if any.
pub fn match_chat_rule(message: &str) -> Option<&'static ChatRule> {
  let lower = message.to_lowercase();
  CHAT_RULES.iter().find(|rule| rule.keywords.iter().any(|k| lower.contains(k)))
}

pub fn mock_chat_reply(message: &str, subject: &str, chapter: &str) -> String {
  let template = match_chat_rule(message).map(|r| r.template).unwrap_or(GENERIC_CHAT_TEMPLATE);
  fill_template(template, &[("chapter", chapter), ("subject", subject), ("message", message)])
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn prompt_carries_context_instructions_and_request() {
    let prompts = Prompts::default();
    let p = build_prompt(&prompts, Mode::Assessment, "Physics", "Kinematics", "Give me 3 MCQs");
    assert!(p.starts_with("Context:\n- Mode: assessment\n- Subject: Physics\n- Chapter: Kinematics"));
    assert!(p.contains(&format!("Instructions: {}", prompts.assessment_instructions)));
    assert!(p.contains("Request: Give me 3 MCQs"));
    assert!(p.ends_with("appropriate for students studying this topic."));
  }

  #[test]
  fn each_mode_has_its_own_instruction() {
    let prompts = Prompts::default();
    let texts: Vec<&str> = Mode::ALL.iter().map(|m| instructions_for(&prompts, *m)).collect();
    assert_ne!(texts[0], texts[1]);
    assert_ne!(texts[1], texts[2]);
    assert!(texts.iter().all(|t| !t.is_empty()));
  }

  #[test]
  fn mock_content_is_selected_by_mode() {
    let rev = mock_content(Mode::Revision, "Physics", "Kinematics");
    assert!(rev.starts_with("# Kinematics - Revision Notes"));
    assert!(rev.contains("fundamental topic in Physics"));

    let asm = mock_content(Mode::Assessment, "Physics", "Kinematics");
    assert!(asm.starts_with("# Kinematics - Practice Assessment"));

    let chat = mock_content(Mode::Chat, "Physics", "Kinematics");
    assert!(chat.starts_with("Hello! I'm here to help you learn about **Kinematics** in Physics."));
    assert!(!chat.contains('{'));
  }

  #[test]
  fn placeholders_inside_names_stay_literal() {
    let rev = mock_content(Mode::Revision, "Physics", "Intro to {subject}");
    assert!(rev.starts_with("# Intro to {subject} - Revision Notes"));

    let reply = mock_chat_reply("What is {chapter}?", "Physics", "Kinematics");
    assert!(reply.contains("What is {chapter}? relates to several key concepts"));
  }

  #[test]
  fn mock_content_is_deterministic() {
    assert_eq!(
      mock_content(Mode::Revision, "Chemistry", "Thermodynamics"),
      mock_content(Mode::Revision, "Chemistry", "Thermodynamics"),
    );
  }

  #[test]
  fn chat_rules_follow_fixed_precedence() {
    assert_eq!(match_chat_rule("Why is this formula true?").map(|r| r.name), Some("formula"));
    assert_eq!(match_chat_rule("EXPLAIN how it works").map(|r| r.name), Some("example"));
    assert_eq!(match_chat_rule("Compare and tell me why").map(|r| r.name), Some("comparison"));
    assert_eq!(match_chat_rule("how does it move").map(|r| r.name), Some("reasoning"));
    assert!(match_chat_rule("Tell me about vectors").is_none());
  }

  #[test]
  fn difference_question_gets_comparison_reply() {
    let reply = mock_chat_reply("What's the difference between speed and velocity?", "Physics", "Kinematics");
    assert!(reply.contains("Let me clarify the differences"));
  }

  #[test]
  fn formula_and_why_resolves_to_formula_reply() {
    let reply = mock_chat_reply("Why does this equation hold?", "Physics", "Kinematics");
    assert!(reply.starts_with("Great question about formulas in Kinematics!"));
  }

  #[test]
  fn generic_reply_restates_message() {
    let reply = mock_chat_reply("Tell me about vectors", "Physics", "Kinematics");
    assert!(reply.starts_with("Thank you for your question about Kinematics!"));
    assert!(reply.contains("Tell me about vectors relates to several key concepts"));
    assert!(reply.contains("In Physics, this is particularly important"));
  }

  #[test]
  fn request_texts_name_chapter_and_subject() {
    assert_eq!(default_request(Mode::Chat, "Physics", "Kinematics"), "Generate chat content for Kinematics in Physics");
    assert!(initial_request(Mode::Revision, "Physics", "Kinematics").starts_with("Generate comprehensive revision notes for Kinematics in Physics."));
  }

  #[test]
  fn chat_context_embeds_mode_and_question() {
    let msg = chat_context_message(&Prompts::default(), Mode::Chat, "Physics", "Kinematics", "What is g?");
    assert_eq!(msg, "Context: chat mode for Physics - Kinematics\n\nStudent Question: What is g?");
  }
}
