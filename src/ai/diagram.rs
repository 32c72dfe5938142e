// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Diagram guarantee for generated question papers.

const EMPTY_PAPER: &str = "### Question Paper\nContent could not be generated.";

const FENCE: &str = "```";

/// Make sure a generated question paper carries at least one fenced diagram.
///
/// Output that already contains a code fence is returned trimmed; otherwise a
/// binary-search-tree practice question is appended.
pub fn ensure_diagram(text: &str, subject: &str) -> String {
    let trimmed = text.trim();
    let normalized = if trimmed.is_empty() {
        EMPTY_PAPER
    } else {
        trimmed
    };
    if normalized.contains(FENCE) {
        return normalized.to_string();
    }

    format!(
        r#"{normalized}


### Auto-Added Diagram Practice ({subject})
Use this diagram-focused question in the paper if required.

Q-Diagram: Construct the Binary Search Tree for the keys: 50, 30, 70, 20, 40, 60, 80 and explain one traversal.
```text
        50
       /  \
     30    70
    / \    / \
  20  40 60  80
```"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_output_is_only_trimmed() {
        let paper = "\n### Internal QP\n```text\n  A\n```\n  ";
        assert_eq!(ensure_diagram(paper, "DS"), "### Internal QP\n```text\n  A\n```");
    }

    #[test]
    fn diagram_is_appended_when_missing() {
        let out = ensure_diagram("### Internal QP\nQ1 ...", "Data Structures");
        assert!(out.starts_with(
            "### Internal QP\nQ1 ...\n\n\n### Auto-Added Diagram Practice (Data Structures)\n"
        ));
        assert!(out.contains("keys: 50, 30, 70, 20, 40, 60, 80"));
        assert!(out.contains("       /  \\\n     30    70\n"));
        assert!(out.ends_with("  20  40 60  80\n```"));
    }

    #[test]
    fn empty_output_gets_placeholder_and_diagram() {
        let out = ensure_diagram("   ", "DBMS");
        assert!(out.starts_with(
            "### Question Paper\nContent could not be generated.\n\n\n### Auto-Added Diagram Practice (DBMS)"
        ));
        assert!(out.contains(FENCE));
    }
}
