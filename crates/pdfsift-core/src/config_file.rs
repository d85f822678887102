use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub scan: Option<ScanSection>,
    pub concurrency: Option<ConcurrencySection>,
    pub output: Option<OutputSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanSection {
    pub folder: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub max_pages: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConcurrencySection {
    pub worker_count: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    pub match_file: Option<String>,
    pub log_file: Option<String>,
}

/// Platform config directory path: `<config_dir>/pdfsift/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pdfsift").join("config.toml"))
}

/// Load config by cascading CWD `.pdfsift.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(&PathBuf::from(".pdfsift.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &PathBuf) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        scan: Some(ScanSection {
            folder: overlay
                .scan
                .as_ref()
                .and_then(|s| s.folder.clone())
                .or_else(|| base.scan.as_ref().and_then(|s| s.folder.clone())),
            keywords: overlay
                .scan
                .as_ref()
                .and_then(|s| s.keywords.clone())
                .or_else(|| base.scan.as_ref().and_then(|s| s.keywords.clone())),
            max_pages: overlay
                .scan
                .as_ref()
                .and_then(|s| s.max_pages)
                .or_else(|| base.scan.as_ref().and_then(|s| s.max_pages)),
        }),
        concurrency: Some(ConcurrencySection {
            worker_count: overlay
                .concurrency
                .as_ref()
                .and_then(|c| c.worker_count)
                .or_else(|| base.concurrency.as_ref().and_then(|c| c.worker_count)),
        }),
        output: Some(OutputSection {
            match_file: overlay
                .output
                .as_ref()
                .and_then(|o| o.match_file.clone())
                .or_else(|| base.output.as_ref().and_then(|o| o.match_file.clone())),
            log_file: overlay
                .output
                .as_ref()
                .and_then(|o| o.log_file.clone())
                .or_else(|| base.output.as_ref().and_then(|o| o.log_file.clone())),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_round_trip_toml() {
        let config = ConfigFile {
            scan: Some(ScanSection {
                keywords: Some(vec!["Trailer".into(), "Boat".into()]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(
            parsed.scan.unwrap().keywords.unwrap(),
            vec!["Trailer".to_string(), "Boat".to_string()]
        );
    }

    #[test]
    fn absent_sections_deserialize_as_none() {
        let toml_str = "[scan]\nfolder = \"/some/folder\"\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        assert!(parsed.concurrency.is_none());
        assert!(parsed.scan.unwrap().max_pages.is_none());
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            scan: Some(ScanSection {
                folder: Some("/base".into()),
                max_pages: Some(3),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            scan: Some(ScanSection {
                folder: Some("/overlay".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        let scan = merged.scan.unwrap();
        assert_eq!(scan.folder.unwrap(), "/overlay");
        // base value preserved when overlay is silent
        assert_eq!(scan.max_pages.unwrap(), 3);
    }
}
