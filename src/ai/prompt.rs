// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Prompt templates for the teaching-assistant endpoints.
//!
//! Everything here is pure string building; nothing touches the network or
//! the database.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::providers::groq::{ChatMessage, ChatRole};

/// Kind of content the faculty AI task produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AiTask {
    Lesson,
    Qp,
    Quiz,
    DocAnalyze,
}

/// Question paper layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum QpType {
    /// 4 slots x 10 marks.
    #[default]
    #[serde(rename = "INTERNAL_40")]
    Internal40,
    /// 10 slots (2 per module) x 10 marks.
    #[serde(rename = "FINAL_100")]
    Final100,
}

/// Search panel state sent by the web client with every AI request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchState {
    pub scheme: String,
    pub branch: String,
    pub semester: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub qp_type: QpType,
    #[serde(default = "default_num_classes")]
    pub num_classes: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default)]
    pub hod_rules: String,
    #[serde(default = "default_part_count")]
    pub num_part_a: String,
    #[serde(default = "default_part_count")]
    pub num_part_b: String,
    #[serde(default)]
    pub pdf_base64: Option<String>,
    #[serde(default)]
    pub syllabus_pdf_base64: Option<String>,
    #[serde(default)]
    pub notes_pdf_base64: Option<String>,
}

fn default_num_classes() -> String {
    "40".to_string()
}

fn default_difficulty() -> String {
    "Medium".to_string()
}

fn default_part_count() -> String {
    "5".to_string()
}

impl SearchState {
    fn hod_rules_or_none(&self) -> &str {
        if self.hod_rules.is_empty() {
            "None"
        } else {
            &self.hod_rules
        }
    }

    fn uploaded_flags(&self) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if has_payload(&self.syllabus_pdf_base64) {
            flags.push("- Syllabus PDF uploaded by faculty.");
        }
        if has_payload(&self.notes_pdf_base64) {
            flags.push("- Notes PDF uploaded by faculty.");
        }
        if has_payload(&self.pdf_base64) {
            flags.push("- Generic reference PDF uploaded.");
        }
        flags
    }
}

fn has_payload(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

/// Build the user prompt for a faculty AI task.
pub fn build_prompt(task: AiTask, search: &SearchState) -> String {
    match task {
        AiTask::Lesson => lesson_prompt(search),
        AiTask::Qp => {
            let mut prompt = match search.qp_type {
                QpType::Internal40 => internal_qp_prompt(search),
                QpType::Final100 => final_qp_prompt(search),
            };
            let flags = search.uploaded_flags();
            if !flags.is_empty() {
                prompt.push_str("\nUPLOADED CONTEXT FLAGS:\n");
                for flag in flags {
                    prompt.push_str(flag);
                    prompt.push('\n');
                }
                prompt.push_str("Use uploaded context signals while drafting questions.");
            }
            prompt
        }
        AiTask::Quiz => quiz_prompt(search),
        AiTask::DocAnalyze => format!(
            "Analyze the uploaded document for {}. Provide a summary of core topics, important \
             formulas, and 5 likely exam questions based on this content.",
            search.subject
        ),
    }
}

/// Append database reference material and its usage rules to a QP prompt.
pub fn append_reference_context(prompt: &mut String, context: &str) {
    prompt.push_str(&format!(
        r#"

REFERENCE MATERIAL FROM INTERNAL DATABASE (SYLLABUS + NOTES):
{context}

REFERENCE USAGE RULES:
- Draft the question paper using the syllabus references first.
- Align phrasing/examples with note references where applicable.
- Prefer topics that appear in both syllabus and notes.
- Keep final output in the mandated QP format without extra commentary.
"#
    ));
}

fn lesson_prompt(search: &SearchState) -> String {
    let SearchState {
        subject,
        branch,
        scheme,
        num_classes,
        ..
    } = search;
    let hod_rules = search.hod_rules_or_none();
    format!(
        r#"Create a professional, highly structured VTU-compliant lesson plan for {subject} ({branch}).
Scheme: {scheme}. Total classes available: {num_classes}.

REQUIRED STRUCTURE:
1. ### Course Objectives: List 3-5 core goals.
2. ### Detailed Schedule Table:
   Use a Markdown table with columns: | Module | Week/Lec | Detailed Topics | Teaching Method | Hours |.
   Ensure the topics are divided logically across the total {num_classes} classes.
3. ### Module Summary: Brief description of each of the 5 modules.
4. ### Course Outcomes (COs): List 5 measurable outcomes using Bloom's Taxonomy.
5. ### Recommended Textbooks: Standard VTU-approved references.

HOD Governance Rules to follow: {hod_rules}"#
    )
}

fn internal_qp_prompt(search: &SearchState) -> String {
    let SearchState {
        subject,
        branch,
        scheme,
        difficulty,
        ..
    } = search;
    let hod_rules = search.hod_rules_or_none();
    format!(
        r####"Draft an INTERNAL question paper for {subject} ({branch}).
Scheme: {scheme}. Difficulty Level: {difficulty}.
MANDATORY PATTERN:
- Total marks must be exactly 40.
- Each question must be 10 marks.
- Create exactly 4 question slots (Q1 to Q4), each worth 10 marks.
- Each slot must contain optional questions from the same module: Qx(a) OR Qx(b).
- Cover modules in a balanced way.
- For every slot, first print a COMMON STEM line before (a) and (b).
- Under each slot, print "Answer any one:" and then (a) OR (b).
DIAGRAM MANDATE:
- Include at least ONE diagram-based question slot.
- For Data Structures / Algorithms topics, the diagram must be related to Binary Tree / Forest / Heap / Graph.
- Print the diagram as ASCII inside a fenced code block directly under that question option.
- If the subject is not diagram-heavy, include a relevant flowchart-style ASCII diagram.
STRICT SECTION ISOLATION RULES:
- Keep all answers out of the question section.
- Put answers only in a separate final section titled "### Answer Key".
OUTPUT FORMAT (Markdown):
### Internal QP (40 Marks)
Q1 (Module ...):
Common Stem: ...
Answer any one:
(a) ... (10 Marks) OR (b) ... (10 Marks)
Q2 (Module ...):
Common Stem: Consider the following binary tree and answer any one:
```text
<insert required diagram if this is the diagram-based slot>
```
Answer any one:
(a) ... (10 Marks) OR (b) ... (10 Marks)
Q3 (Module ...):
Common Stem: ...
Answer any one:
(a) ... (10 Marks) OR (b) ... (10 Marks)
Q4 (Module ...):
Common Stem: ...
Answer any one:
(a) ... (10 Marks) OR (b) ... (10 Marks)
### Answer Key
Q1: a->..., b->...
Q2: a->..., b->...
Q3: a->..., b->...
Q4: a->...
HOD Governance Rules to follow: {hod_rules}"####
    )
}

fn final_qp_prompt(search: &SearchState) -> String {
    let SearchState {
        subject,
        branch,
        scheme,
        difficulty,
        ..
    } = search;
    let hod_rules = search.hod_rules_or_none();

    let mut slots = String::new();
    for module in 1..=5 {
        slots.push_str(&format!("#### Module {module}\n"));
        for question in [module * 2 - 1, module * 2] {
            slots.push_str(&format!(
                "Q{question}:\nCommon Stem: ...\nAnswer any one:\n(a) ... (10 Marks) OR (b) ... (10 Marks)\n"
            ));
        }
    }

    format!(
        r####"Draft a FINAL EXAM question paper for {subject} ({branch}).
Scheme: {scheme}. Difficulty Level: {difficulty}.
MANDATORY PATTERN:
- Total marks must be exactly 100.
- Every question must be 10 marks.
- Use all 5 modules.
- Every module must include optional questions.
- Create exactly 10 question slots total (2 slots per module), each 10 marks.
- Every slot must have two options from the same module: Qx(a) OR Qx(b).
- For every slot, print a COMMON STEM line before (a) and (b).
- Under each slot, print "Answer any one:" and then (a) OR (b).
DIAGRAM MANDATE:
- Include at least TWO diagram-based question slots.
- For Data Structures / Algorithms topics, include Binary Tree / Forest / Heap / Graph style diagrams.
- Render each required diagram as ASCII inside fenced code blocks below the question option.
STRICT SECTION ISOLATION RULES:
- Keep all answers out of the question section.
- Put answers only in a separate final section titled "### Answer Key".
OUTPUT FORMAT (Markdown):
### Final Exam QP (100 Marks)
{slots}```text
<insert required diagram blocks under the diagram-based questions>
```
### Answer Key
Q1: a->..., b->...
...
Q10: a->..., b->...
HOD Governance Rules to follow: {hod_rules}"####
    )
}

fn quiz_prompt(search: &SearchState) -> String {
    let SearchState { subject, branch, .. } = search;
    format!(
        r####"Generate 10 multiple-choice questions for {subject} ({branch}) Module 1.
STRICT SECTION ISOLATION RULES:
- Keep questions section answer-free.
- Do not reveal answers in the question statements or options.
- Provide answers only in a separate "### Answer Key" section.
- Provide explanations only in a separate "### Explanations" section.
OUTPUT FORMAT (Markdown):
### Questions
1. ...
...
### Answer Key
1. ...
...
### Explanations
1. ...
..."####
    )
}

/// Prompt for `/ai/syllabus`.
pub fn syllabus_lookup_prompt(search: &SearchState) -> String {
    format!(
        "Find and summarize the official VTU syllabus for {}, {} under {}. Provide a clear \
         breakdown of modules. Focus on official university links.",
        search.branch, search.semester, search.scheme
    )
}

/// Prompt for `/ai/notes`.
pub fn notes_lookup_prompt(search: &SearchState) -> String {
    format!(
        "Find DIRECT module-wise notes, PDF question banks, and study materials for the VTU \
         subject \"{}\" ({}, {}).\n\
         YOU MUST PRIORITIZE AND SEARCH SPECIFICALLY within these domains: \"vtucode.in\", \
         \"vtu-circle.com\", \"vtunotesforall.com\", and \"azdocuments.in\".\n\
         Do not provide generic university homepages. Provide direct resource page URLs where \
         students can download PDFs.",
        search.subject, search.branch, search.semester
    )
}

/// System instruction for the tutor chat.
pub fn chat_system_prompt(search: &SearchState) -> String {
    let SearchState {
        branch,
        semester,
        scheme,
        ..
    } = search;
    format!(
        r#"You are MITM EduOs AI, a world-class engineering professor specialized in the VTU curriculum.
Current context: Branch: {branch}, Sem: {semester}, Scheme: {scheme}.

CRITICAL OUTPUT RULES:
1. STRUCTURE: Always use Markdown. Use '###' for section headers, bolding for key terms, and bullet points for lists.
2. TECHNICAL DEPTH: Provide rigorous engineering explanations.
3. NUMERICALS: If a student asks for a problem, solve it step-by-step with LaTeX formatting (e.g., $$E = mc^2$$).
4. SUMMARY TABLES: Use Markdown tables when comparing concepts or technologies.
5. EXAM FOCUS: Highlight concepts frequently asked in VTU examinations.
6. CLARITY: Keep the tone professional, encouraging, and academic."#
    )
}

/// Convert client chat history into provider messages.
///
/// Accepts both `{role, content}` and `{role, parts: [{text}]}` shapes.
/// `model` becomes `assistant`, unknown roles become `user`, and entries
/// with no text after trimming are dropped.
pub fn normalize_history(items: &[Value]) -> Vec<ChatMessage> {
    items
        .iter()
        .filter_map(|item| {
            let role = match item.get("role").and_then(Value::as_str) {
                Some("system") => ChatRole::System,
                Some("assistant") | Some("model") => ChatRole::Assistant,
                _ => ChatRole::User,
            };
            let content = history_text(item).trim().to_string();
            (!content.is_empty()).then_some(ChatMessage { role, content })
        })
        .collect()
}

fn history_text(item: &Value) -> String {
    if let Some(content) = item.get("content").and_then(Value::as_str) {
        return content.to_string();
    }
    if let Some(parts) = item.get("parts").and_then(Value::as_array) {
        return parts
            .iter()
            .filter(|part| part.is_object())
            .map(|part| match part.get("text") {
                None => String::new(),
                Some(Value::String(text)) => text.clone(),
                Some(other) => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n");
    }
    item.get("text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn search() -> SearchState {
        serde_json::from_value(json!({
            "scheme": "2022",
            "branch": "ISE",
            "semester": "3rd Semester",
            "subject": "Data Structures"
        }))
        .unwrap()
    }

    #[test]
    fn search_state_defaults() {
        let s = search();
        assert_eq!(s.qp_type, QpType::Internal40);
        assert_eq!(s.num_classes, "40");
        assert_eq!(s.difficulty, "Medium");
        assert_eq!(s.num_part_a, "5");
        assert_eq!(s.num_part_b, "5");
        assert!(s.pdf_base64.is_none());
    }

    #[test]
    fn search_state_requires_scheme_branch_semester() {
        let result = serde_json::from_value::<SearchState>(json!({"branch": "ISE"}));
        assert!(result.is_err());
    }

    #[test]
    fn task_and_qp_type_wire_names() {
        assert_eq!(serde_json::to_value(AiTask::DocAnalyze).unwrap(), "DOC_ANALYZE");
        assert_eq!(serde_json::to_value(QpType::Final100).unwrap(), "FINAL_100");
        let qp: QpType = serde_json::from_value(json!("INTERNAL_40")).unwrap();
        assert_eq!(qp, QpType::Internal40);
    }

    #[test]
    fn lesson_prompt_includes_classes_and_rules() {
        let mut s = search();
        let prompt = build_prompt(AiTask::Lesson, &s);
        assert!(prompt.contains("Total classes available: 40."));
        assert!(prompt.ends_with("HOD Governance Rules to follow: None"));

        s.hod_rules = "Cover lab topics".to_string();
        let prompt = build_prompt(AiTask::Lesson, &s);
        assert!(prompt.ends_with("HOD Governance Rules to follow: Cover lab topics"));
    }

    #[test]
    fn internal_qp_has_four_slots_and_answer_key() {
        let prompt = build_prompt(AiTask::Qp, &search());
        assert!(prompt.contains("Total marks must be exactly 40."));
        for slot in 1..=4 {
            assert!(prompt.contains(&format!("Q{slot} (Module ...):")));
        }
        assert!(!prompt.contains("Q5"));
        assert!(prompt.contains("```text"));
        assert!(prompt.contains(r####"titled "### Answer Key"."####));
        assert!(!prompt.contains("UPLOADED CONTEXT FLAGS"));
    }

    #[test]
    fn final_qp_has_ten_slots_across_five_modules() {
        let mut s = search();
        s.qp_type = QpType::Final100;
        let prompt = build_prompt(AiTask::Qp, &s);
        assert!(prompt.contains("Total marks must be exactly 100."));
        for module in 1..=5 {
            assert!(prompt.contains(&format!("#### Module {module}\n")));
        }
        for slot in 1..=10 {
            assert!(prompt.contains(&format!("\nQ{slot}:\nCommon Stem: ...")));
        }
        assert_eq!(prompt.matches("Answer any one:\n").count(), 10);
        assert!(prompt.contains("Q10:\nCommon Stem: ...\nAnswer any one:\n(a) ... (10 Marks) OR (b) ... (10 Marks)\n```text\n"));
    }

    #[test]
    fn uploaded_flags_are_listed_in_order() {
        let mut s = search();
        s.pdf_base64 = Some("JVBERi0=".to_string());
        s.notes_pdf_base64 = Some("JVBERi0=".to_string());
        s.syllabus_pdf_base64 = Some(String::new());

        let prompt = build_prompt(AiTask::Qp, &s);
        assert!(prompt.ends_with(
            "\nUPLOADED CONTEXT FLAGS:\n\
             - Notes PDF uploaded by faculty.\n\
             - Generic reference PDF uploaded.\n\
             Use uploaded context signals while drafting questions."
        ));
    }

    #[test]
    fn uploads_do_not_affect_other_tasks() {
        let mut s = search();
        s.pdf_base64 = Some("JVBERi0=".to_string());
        assert!(!build_prompt(AiTask::Quiz, &s).contains("UPLOADED"));
    }

    #[test]
    fn quiz_isolates_answers_and_explanations() {
        let prompt = build_prompt(AiTask::Quiz, &search());
        assert!(prompt.starts_with("Generate 10 multiple-choice questions for Data Structures (ISE) Module 1."));
        assert!(prompt.contains(r####"separate "### Answer Key" section."####));
        assert!(prompt.contains(r####"separate "### Explanations" section."####));
        assert!(prompt.ends_with("### Explanations\n1. ...\n..."));
    }

    #[test]
    fn doc_analyze_mentions_subject() {
        let prompt = build_prompt(AiTask::DocAnalyze, &search());
        assert!(prompt.starts_with("Analyze the uploaded document for Data Structures."));
        assert!(prompt.contains("5 likely exam questions"));
    }

    #[test]
    fn reference_context_block_is_appended() {
        let mut prompt = "QP".to_string();
        append_reference_context(&mut prompt, "Branch: ISE");
        assert!(prompt.starts_with(
            "QP\n\nREFERENCE MATERIAL FROM INTERNAL DATABASE (SYLLABUS + NOTES):\nBranch: ISE\n\nREFERENCE USAGE RULES:\n"
        ));
        assert!(prompt.ends_with("without extra commentary.\n"));
    }

    #[test]
    fn lookup_prompts_use_search_fields() {
        let s = search();
        assert!(syllabus_lookup_prompt(&s).starts_with(
            "Find and summarize the official VTU syllabus for ISE, 3rd Semester under 2022."
        ));
        let notes = notes_lookup_prompt(&s);
        assert!(notes.contains("subject \"Data Structures\" (ISE, 3rd Semester).\n"));
        assert!(notes.contains("\"azdocuments.in\".\nDo not provide"));
    }

    #[test]
    fn chat_prompt_names_context() {
        let prompt = chat_system_prompt(&search());
        assert!(prompt.contains("Current context: Branch: ISE, Sem: 3rd Semester, Scheme: 2022."));
        assert!(prompt.contains("6. CLARITY"));
    }

    #[test]
    fn history_is_normalized() {
        let history = vec![
            json!({"role": "user", "content": "  What is a heap? "}),
            json!({"role": "model", "parts": [{"text": "A heap is"}, {"text": "a tree."}, "skip"]}),
            json!({"role": "tool", "text": "side note"}),
            json!({"role": "system", "content": "be brief"}),
            json!({"role": "assistant", "content": "   "}),
            json!({"content": ["not", "a", "string"]}),
        ];

        let messages = normalize_history(&history);
        assert_eq!(
            messages,
            vec![
                ChatMessage {
                    role: ChatRole::User,
                    content: "What is a heap?".to_string()
                },
                ChatMessage {
                    role: ChatRole::Assistant,
                    content: "A heap is\na tree.".to_string()
                },
                ChatMessage {
                    role: ChatRole::User,
                    content: "side note".to_string()
                },
                ChatMessage {
                    role: ChatRole::System,
                    content: "be brief".to_string()
                },
            ]
        );
    }
}
