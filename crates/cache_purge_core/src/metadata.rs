use serde::{Deserialize, Serialize};

/// Browsers always revalidate; the edge keeps a copy for a day.
pub const CACHE_CONTROL: &str = "max-age=0, s-maxage=86400";
pub const WASM_CONTENT_TYPE: &str = "application/wasm";

const WASM_EXTENSION: &str = "wasm";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetadataPatch {
    pub cache_control: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl MetadataPatch {
    pub fn for_file(file_name: &str) -> Self {
        Self {
            cache_control: CACHE_CONTROL.to_string(),
            content_type: has_wasm_extension(file_name).then(|| WASM_CONTENT_TYPE.to_string()),
        }
    }
}

/// Only the final extension counts, compared case-sensitively. A name
/// without a `.` or ending in `.` has no extension.
pub fn has_wasm_extension(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((_, extension)) => !extension.is_empty() && extension == WASM_EXTENSION,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn wasm_extension_detection() {
        assert!(has_wasm_extension("module.wasm"));
        assert!(!has_wasm_extension("module.WASM"));
        assert!(!has_wasm_extension("module."));
        assert!(!has_wasm_extension("module"));
        assert!(has_wasm_extension("a.b.wasm"));
        assert!(!has_wasm_extension("module.wasm.map"));
        assert!(has_wasm_extension("pkg/app_bg.wasm"));
    }

    #[test]
    fn wasm_patch_sets_content_type() {
        let patch = MetadataPatch::for_file("fonts/Poppins.wasm");
        assert_eq!(patch.cache_control, "max-age=0, s-maxage=86400");
        assert_eq!(patch.content_type.as_deref(), Some("application/wasm"));
    }

    #[test]
    fn other_files_only_get_cache_control() {
        for name in ["index.html", "styles.css", "module.WASM", "wasm", "bin."] {
            let patch = MetadataPatch::for_file(name);
            assert_eq!(patch.cache_control, CACHE_CONTROL, "{name}");
            assert_eq!(patch.content_type, None, "{name}");
        }
    }

    #[test]
    fn absent_content_type_is_not_serialized() {
        let value = serde_json::to_value(MetadataPatch::for_file("a.svg")).expect("serialize");
        assert_eq!(value, json!({"cache_control": CACHE_CONTROL}));
    }
}
