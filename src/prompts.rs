//! Prompt construction and LLM response cleanup.
//!
//! Two fixed-intent prompts (summarize, rewrite-for-readability) and the
//! fence stripper that undoes the markdown wrapping models add despite
//! being told not to.

/// Substituted when the oracle returns empty summary text.
pub const SUMMARY_FALLBACK: &str = "Unable to generate summary. Please try again.";

/// Prompt asking for a 3-4 line summary of `code`. The raw code is
/// embedded verbatim inside a fenced block; the instructions forbid code
/// or commentary in the answer.
pub fn summary_prompt(code: &str, filename: &str) -> String {
    format!(
        "You are a code review expert. Analyze the following code and provide a concise summary in EXACTLY 3-4 lines.\n\
         \n\
         Focus on:\n\
         - What the code does (main purpose)\n\
         - Key functionality or algorithms used\n\
         - Overall code quality and structure\n\
         \n\
         File: {filename}\n\
         \n\
         Code:\n\
         ```\n\
         {code}\n\
         ```\n\
         \n\
         Provide ONLY a 3-4 line summary. Do not include any code, explanations, or additional commentary."
    )
}

/// Prompt asking for a readability-only rewrite of `code`: formatting,
/// naming, documentation and structure may change, behavior may not.
pub fn rewrite_prompt(code: &str, filename: &str) -> String {
    format!(
        "You are a code review expert. Improve the following code by enhancing ONLY its readability, structure, and documentation.\n\
         \n\
         STRICT RULES:\n\
         1. DO NOT change the logic or functionality\n\
         2. DO NOT add new features or capabilities\n\
         3. DO NOT remove existing functionality\n\
         4. ONLY improve:\n\
         \x20  - Code formatting and indentation\n\
         \x20  - Variable and function naming (make them more descriptive)\n\
         \x20  - Add documentation to functions and types\n\
         \x20  - Add inline comments for complex logic\n\
         \x20  - Improve code structure and organization\n\
         \x20  - Follow language-specific best practices\n\
         \n\
         File: {filename}\n\
         \n\
         Original Code:\n\
         ```\n\
         {code}\n\
         ```\n\
         \n\
         Return ONLY the improved code. Do not include explanations, markdown formatting, or any text outside the code itself."
    )
}

/// Strip a single leading and trailing markdown fence line from an LLM
/// response.
///
/// Deliberately narrow: this is a structural check on the first and last
/// lines, not a markdown parser. Nested or mid-text fences are left
/// alone, since over-stripping risks eating legitimate code lines.
pub fn strip_markdown_fences(response: &str) -> String {
    let trimmed = response.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }

    let mut lines: Vec<&str> = trimmed.lines().collect();
    lines.remove(0);
    if let Some(last) = lines.last() {
        if last.starts_with("```") {
            lines.pop();
        }
    }
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_prompt_embeds_code_and_filename() {
        let prompt = summary_prompt("print('hi')", "hello.py");
        assert!(prompt.contains("File: hello.py"));
        assert!(prompt.contains("```\nprint('hi')\n```"));
        assert!(prompt.contains("EXACTLY 3-4 lines"));
    }

    #[test]
    fn rewrite_prompt_forbids_behavior_changes() {
        let prompt = rewrite_prompt("x = 1", "vars.py");
        assert!(prompt.contains("DO NOT change the logic"));
        assert!(prompt.contains("DO NOT add new features"));
        assert!(prompt.contains("File: vars.py"));
        assert!(prompt.contains("```\nx = 1\n```"));
    }

    #[test]
    fn fence_free_response_is_unchanged() {
        let code = "def f():\n    return 1";
        assert_eq!(strip_markdown_fences(code), code);
    }

    #[test]
    fn leading_and_trailing_fences_are_dropped() {
        let wrapped = "```python\ndef f():\n    return 1\n```";
        assert_eq!(strip_markdown_fences(wrapped), "def f():\n    return 1");
    }

    #[test]
    fn bare_fences_without_language_tag_are_dropped() {
        let wrapped = "```\nlet x = 1;\n```";
        assert_eq!(strip_markdown_fences(wrapped), "let x = 1;");
    }

    #[test]
    fn leading_fence_without_closing_fence() {
        let wrapped = "```rust\nfn main() {}";
        assert_eq!(strip_markdown_fences(wrapped), "fn main() {}");
    }

    #[test]
    fn interior_fences_are_preserved() {
        // Only the outermost pair is structural; fences inside the code
        // (e.g. a doc example) must survive.
        let wrapped = "```markdown\nSome text\n```rust\nfn f() {}\n```";
        assert_eq!(strip_markdown_fences(wrapped), "Some text\n```rust\nfn f() {}");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let wrapped = "  \n```\ncode here\n```\n  ";
        assert_eq!(strip_markdown_fences(wrapped), "code here");
    }

    #[test]
    fn empty_response_stays_empty() {
        assert_eq!(strip_markdown_fences(""), "");
        assert_eq!(strip_markdown_fences("   \n  "), "");
    }
}
