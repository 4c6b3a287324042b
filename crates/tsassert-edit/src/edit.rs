//! `EditApplier` (§4.5, component C5): merges the planner's candidate
//! sites into the original source buffer in one linear pass, emitting
//! the new source and a v3 source map in lockstep (§9 "compute
//! mappings incrementally ... rather than diffing two buffers").

use tsassert_common::{CoreError, LineMap, Span};
use tsassert_flow::SiteKind;
use tsassert_planner::{CandidateSite, ReferenceStub};
use tsassert_synth::escaping::js_string_literal;

use crate::source_map::{SourceMapGenerator, SourceMapV3};

#[derive(Debug, Clone)]
pub struct ApplyOptions {
    /// Name recorded as the source map's `file` field.
    pub generated_file: String,
    /// Name recorded in the source map's `sources` array.
    pub source_file: String,
    pub include_content: bool,
    pub inline: bool,
}

#[derive(Debug, Clone)]
pub struct AppliedEdits {
    pub code: String,
    pub source_map: Option<SourceMapV3>,
}

/// Applies every validated `CandidateSite`'s fragment plus the
/// planner's hoisted `_checkRef_*` stubs to `source`, producing the
/// rewritten file and (unless the caller disables it) its source map.
pub fn apply_edits(
    source: &str,
    sites: &[CandidateSite],
    reference_stubs: &[ReferenceStub],
    options: &ApplyOptions,
) -> Result<AppliedEdits, CoreError> {
    let line_map = LineMap::build(source);

    let mut edits: Vec<(Span, String, u32)> = Vec::new();
    let mut helpers: Vec<String> = Vec::new();

    for site in sites {
        let Some(fragment) = &site.fragment else { continue };
        for helper in &fragment.new_helpers {
            helpers.push(helper.source.clone());
        }
        if let Some((span, text)) = build_replacement(source, site, &fragment.expr) {
            edits.push((span, text, site.byte_span.start));
        }
    }
    for stub in reference_stubs {
        helpers.push(stub.source.clone());
    }

    edits.sort_by_key(|(span, ..)| span.start);
    for pair in edits.windows(2) {
        if pair[0].0.end > pair[1].0.start {
            return Err(CoreError::Internal(format!(
                "overlapping edits at {} and {}: SitePlanner must only emit non-overlapping sites",
                pair[0].0, pair[1].0
            )));
        }
    }

    let mut code = String::new();
    let mut gen_line = 0u32;
    let mut gen_col = 0u32;
    for helper in &helpers {
        push_tracked(&mut code, helper, &mut gen_line, &mut gen_col);
        push_tracked(&mut code, "\n", &mut gen_line, &mut gen_col);
    }

    let mut generator = SourceMapGenerator::new(options.generated_file.clone());
    let source_index = if options.include_content {
        generator.add_source_with_content(options.source_file.clone(), source.to_string())
    } else {
        generator.add_source(options.source_file.clone())
    };

    let bytes = source.as_bytes();
    let mut cursor = 0u32;

    for (span, replacement, anchor) in &edits {
        copy_unchanged(bytes, &mut cursor, span.start, &line_map, &mut code, &mut gen_line, &mut gen_col, &mut generator, source_index);

        let anchor_pos = line_map.position_for(*anchor);
        generator.add_simple_mapping(gen_line, gen_col, source_index, anchor_pos.line, anchor_pos.column);
        push_tracked(&mut code, replacement, &mut gen_line, &mut gen_col);
        cursor = span.end;
    }
    copy_unchanged(bytes, &mut cursor, source.len() as u32, &line_map, &mut code, &mut gen_line, &mut gen_col, &mut generator, source_index);

    let source_map = if options.inline {
        None
    } else {
        Some(generator.generate())
    };
    if options.inline {
        code.push('\n');
        code.push_str(&generator.generate_inline());
    }

    Ok(AppliedEdits { code, source_map })
}

/// Copies `bytes[*cursor..end)` into `code` verbatim, advancing the
/// generated-position counters and recording an identity mapping at
/// the start of every line crossed (§4.5 "unchanged regions keep an
/// identity mapping at each line start").
#[allow(clippy::too_many_arguments)]
fn copy_unchanged(
    bytes: &[u8],
    cursor: &mut u32,
    end: u32,
    line_map: &LineMap,
    code: &mut String,
    gen_line: &mut u32,
    gen_col: &mut u32,
    generator: &mut SourceMapGenerator,
    source_index: usize,
) {
    if *cursor >= end {
        return;
    }
    let slice = std::str::from_utf8(&bytes[*cursor as usize..end as usize]).unwrap_or("");
    let mut orig_pos = *cursor;
    for ch in slice.chars() {
        code.push(ch);
        orig_pos += ch.len_utf8() as u32;
        if ch == '\n' {
            *gen_line += 1;
            *gen_col = 0;
            let pos = line_map.position_for(orig_pos);
            generator.add_simple_mapping(*gen_line, 0, source_index, pos.line, pos.column);
        } else {
            *gen_col += ch.len_utf8() as u32;
        }
    }
    *cursor = end;
}

fn push_tracked(code: &mut String, text: &str, gen_line: &mut u32, gen_col: &mut u32) {
    for ch in text.chars() {
        code.push(ch);
        if ch == '\n' {
            *gen_line += 1;
            *gen_col = 0;
        } else {
            *gen_col += ch.len_utf8() as u32;
        }
    }
}

/// Builds the replacement text for one validated site, or `None` for a
/// skipped site (no `fragment`, already filtered by the caller).
/// `expr` is always invocable as `expr(value, path)` for `Assert` mode
/// fragments (a parenthesized arrow or a hoisted helper name) or
/// `expr(value)` for the `Stringify`-mode fragment used by
/// `JsonStringify` sites.
fn build_replacement(source: &str, site: &CandidateSite, expr: &str) -> Option<(Span, String)> {
    match site.kind {
        SiteKind::Parameter => {
            let quoted = js_string_literal(&site.name);
            if site.insertion.is_empty() {
                let text = format!("{n} = ({expr})({n}, {quoted});\n  ", n = site.name);
                Some((site.insertion, text))
            } else {
                // Expression-bodied arrow: no statement position exists, so
                // the check runs for its side effect via the comma operator
                // ahead of the original body expression.
                let body_text = site.insertion.slice(source);
                let text = format!("(({expr})({n}, {quoted}), {body_text})", n = site.name);
                Some((site.insertion, text))
            }
        }
        SiteKind::Return => {
            let original = site.insertion.slice(source);
            Some((site.insertion, format!("({expr})({original}, \"return\")")))
        }
        SiteKind::Cast => {
            let original = site.insertion.slice(source);
            Some((site.insertion, format!("({expr})({original}, \"as\")")))
        }
        SiteKind::JsonParse => {
            let original = site.insertion.slice(source);
            Some((site.insertion, format!("({expr})({original}, \"JSON.parse\")")))
        }
        SiteKind::JsonStringify => {
            // `expr` here is a Stringify-mode fragment: `(v) => <json text>`,
            // so the whole `JSON.stringify(arg)` call is replaced, not wrapped.
            let original = site.insertion.slice(source);
            let arg = extract_single_call_arg(original);
            Some((site.insertion, format!("({expr})({arg})")))
        }
    }
}

fn extract_single_call_arg(call_text: &str) -> &str {
    let open = call_text.find('(').map(|i| i + 1).unwrap_or(0);
    let close = call_text.rfind(')').unwrap_or(call_text.len());
    call_text.get(open..close).unwrap_or("").trim()
}

#[cfg(test)]
#[path = "tests/edit.rs"]
mod tests;
