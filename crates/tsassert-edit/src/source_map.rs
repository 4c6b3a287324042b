//! v3 source map generation (§4.5, §6 "Source map output"). Mappings
//! are accumulated incrementally as the edit applier walks the
//! original buffer, then VLQ-encoded once at `generate()` time.

use serde::Serialize;

use crate::vlq;

#[derive(Debug, Clone)]
struct MappingEntry {
    gen_line: u32,
    gen_col: u32,
    source_index: u32,
    source_line: u32,
    source_col: u32,
    name_index: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMapV3 {
    pub version: u8,
    pub file: String,
    pub sources: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<String>>,
    pub names: Vec<String>,
    pub mappings: String,
}

/// Builds a v3 source map one mapping at a time. Named and shaped after
/// the teacher's `tsz-common` source map generator (its API is fixed by
/// `tsz-common/tests/source_map.rs`, the only surviving trace of that
/// module in this pack): `add_source`/`add_source_with_content` return
/// the source index to pass to `add_mapping`/`add_simple_mapping`.
#[derive(Debug, Default)]
pub struct SourceMapGenerator {
    file: String,
    sources: Vec<String>,
    sources_content: Vec<Option<String>>,
    names: Vec<String>,
    mappings: Vec<MappingEntry>,
}

impl SourceMapGenerator {
    #[must_use]
    pub fn new(file: String) -> Self {
        Self { file, ..Self::default() }
    }

    pub fn add_source(&mut self, source: String) -> usize {
        self.sources.push(source);
        self.sources_content.push(None);
        self.sources.len() - 1
    }

    pub fn add_source_with_content(&mut self, source: String, content: String) -> usize {
        self.sources.push(source);
        self.sources_content.push(Some(content));
        self.sources.len() - 1
    }

    pub fn add_name(&mut self, name: String) -> usize {
        self.names.push(name);
        self.names.len() - 1
    }

    pub fn add_simple_mapping(&mut self, gen_line: u32, gen_col: u32, source_index: usize, source_line: u32, source_col: u32) {
        self.add_mapping(gen_line, gen_col, source_index, source_line, source_col, None);
    }

    pub fn add_mapping(
        &mut self,
        gen_line: u32,
        gen_col: u32,
        source_index: usize,
        source_line: u32,
        source_col: u32,
        name_index: Option<usize>,
    ) {
        self.mappings.push(MappingEntry {
            gen_line,
            gen_col,
            source_index: source_index as u32,
            source_line,
            source_col,
            name_index: name_index.map(|n| n as u32),
        });
    }

    #[must_use]
    pub fn generate(&self) -> SourceMapV3 {
        let mut sorted = self.mappings.clone();
        sorted.sort_by_key(|m| (m.gen_line, m.gen_col));

        let mut mappings = String::new();
        let mut cur_line = 0u32;
        let mut first_on_line = true;
        let (mut prev_col, mut prev_src, mut prev_line, mut prev_source_col, mut prev_name) = (0i64, 0i64, 0i64, 0i64, 0i64);

        for m in &sorted {
            while cur_line < m.gen_line {
                mappings.push(';');
                cur_line += 1;
                first_on_line = true;
                prev_col = 0;
            }
            if !first_on_line {
                mappings.push(',');
            }
            first_on_line = false;

            mappings.push_str(&vlq::encode((i64::from(m.gen_col) - prev_col) as i32));
            prev_col = i64::from(m.gen_col);

            mappings.push_str(&vlq::encode((i64::from(m.source_index) - prev_src) as i32));
            prev_src = i64::from(m.source_index);

            mappings.push_str(&vlq::encode((i64::from(m.source_line) - prev_line) as i32));
            prev_line = i64::from(m.source_line);

            mappings.push_str(&vlq::encode((i64::from(m.source_col) - prev_source_col) as i32));
            prev_source_col = i64::from(m.source_col);

            if let Some(name_index) = m.name_index {
                mappings.push_str(&vlq::encode((i64::from(name_index) - prev_name) as i32));
                prev_name = i64::from(name_index);
            }
        }

        let sources_content = if self.sources_content.iter().any(Option::is_some) {
            Some(self.sources_content.iter().map(|c| c.clone().unwrap_or_default()).collect())
        } else {
            None
        };

        SourceMapV3 {
            version: 3,
            file: self.file.clone(),
            sources: self.sources.clone(),
            sources_content,
            names: self.names.clone(),
            mappings,
        }
    }

    #[must_use]
    pub fn generate_inline(&self) -> String {
        let map = self.generate();
        let json = serde_json::to_string(&map).unwrap_or_default();
        format!("//# sourceMappingURL=data:application/json;base64,{}", base64_encode(json.as_bytes()))
    }
}

const STANDARD_BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

fn base64_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);
    for chunk in bytes.chunks(3) {
        let b0 = chunk[0];
        let b1 = chunk.get(1).copied();
        let b2 = chunk.get(2).copied();

        out.push(STANDARD_BASE64[(b0 >> 2) as usize] as char);
        out.push(STANDARD_BASE64[(((b0 & 0x03) << 4) | (b1.unwrap_or(0) >> 4)) as usize] as char);
        if let Some(b1) = b1 {
            out.push(STANDARD_BASE64[(((b1 & 0x0f) << 2) | (b2.unwrap_or(0) >> 6)) as usize] as char);
        } else {
            out.push('=');
        }
        if let Some(b2) = b2 {
            out.push(STANDARD_BASE64[(b2 & 0x3f) as usize] as char);
        } else {
            out.push('=');
        }
    }
    out
}

#[cfg(test)]
#[path = "tests/source_map.rs"]
mod tests;
