//! JavaScript minification.
//!
//! Parses the source with OXC and prints it back with the code generator's
//! minified layout: comments and insignificant whitespace go, nothing is
//! renamed, folded or reordered. Function declarations stay declarations,
//! so hoisting, `new` and `this` behave as before.
//!
//! Sources that do not parse are returned unchanged. Template tags outside
//! string literals (`var items = {{ items }};`) are the usual reason.

use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use crate::MinifyError;

/// Minifies a JavaScript source.
pub fn minify(input: &[u8]) -> Result<Vec<u8>, MinifyError> {
    let source = std::str::from_utf8(input)?;
    if source.trim().is_empty() {
        return Ok(Vec::new());
    }

    let allocator = Allocator::default();
    // Classic scripts first; `import`/`export` only parse as a module.
    for source_type in [SourceType::cjs(), SourceType::mjs()] {
        let parsed = Parser::new(&allocator, source, source_type).parse();
        if parsed.panicked || !parsed.errors.is_empty() {
            continue;
        }
        let printed = Codegen::new()
            .with_options(CodegenOptions::minify())
            .build(&parsed.program);
        return Ok(printed.code.into_bytes());
    }

    Ok(input.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minified(js: &str) -> String {
        String::from_utf8(minify(js.as_bytes()).unwrap()).unwrap()
    }

    const NTH: &str = r#"
// Return the ordinal suffix for a number
function nth(o) {
    return o + (['st', 'nd', 'rd'][(o + '').match(/1?\d\b/) - 1] || 'th');
}
"#;

    #[test]
    fn test_shrinks_source() {
        let out = minified(NTH);
        assert!(out.len() < NTH.len());
        assert!(!out.contains("ordinal suffix"));
        assert!(!out.contains("\n    "));
        assert!(out.contains("function nth("));
    }

    #[test]
    fn test_constructor_stays_a_function_declaration() {
        let out = minified("function Point(x) {\n  this.x = x;\n}\nvar p = new Point(1);\n");
        assert!(out.contains("function Point("), "got {out}");
        assert!(out.contains("this.x"));
        assert!(out.contains("new Point(1)"));
        assert!(!out.contains("=>"));
    }

    #[test]
    fn test_hoisted_call_keeps_declaration() {
        let out = minified("greet();\nfunction greet() {\n  return 'hi';\n}\n");
        assert!(out.contains("function greet("), "got {out}");
        assert!(!out.contains("var greet"));
        assert!(out.find("greet()").unwrap() < out.find("function greet").unwrap());
    }

    #[test]
    fn test_closing_script_literal_is_accepted() {
        let out = minified("var label = \"</script>\";\n");
        assert!(out.contains("label"), "got {out}");
        assert!(out.contains("script"));
    }

    #[test]
    fn test_template_tags_in_strings_survive() {
        let out = minified("var title = \"{{ title }}\";\n");
        assert!(out.contains("{{ title }}"), "got {out}");
    }

    #[test]
    fn test_unparsable_template_passes_through() {
        let source = "var items = {{ items }};\n";
        assert_eq!(minified(source), source);
    }

    #[test]
    fn test_modules_parse() {
        let out = minified("import { a } from './a.js';\nexport const b = a + 1;\n");
        assert!(out.contains("export"), "got {out}");
    }

    #[test]
    fn test_idempotent() {
        let once = minified(NTH);
        assert_eq!(minified(&once), once);
    }

    #[test]
    fn test_blank_source() {
        assert!(minify(b"  \n ").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(matches!(minify(&[0xff, 0xfe]), Err(MinifyError::Utf8(_))));
    }
}
