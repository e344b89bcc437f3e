//! Configuration management for the docbabel server

use std::env;
use std::str::FromStr;

use crate::ocr::{EngineConfig, OcrSelectorConfig, DEFAULT_CANDIDATES, DEFAULT_DPI};
use crate::translate::{ChainConfig, ProviderKind, ProviderSettings};

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
    pub translation: TranslationConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body (scanned PDFs run large)
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Path or name of the tesseract executable
    pub tesseract_bin: String,
    /// Path or name of poppler's pdftoppm
    pub pdftoppm_bin: String,
    pub dpi: u32,
    /// Broad-pass hypotheses, in order
    pub candidates: Vec<String>,
    pub oem: u8,
    pub psm: u8,
}

#[derive(Debug, Clone)]
pub struct TranslationConfig {
    pub providers: ProviderSettings,
    pub chain: ChainConfig,
}

impl Default for Config {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                max_upload_bytes: 25 * 1024 * 1024,
            },
            ocr: OcrConfig {
                tesseract_bin: "tesseract".to_string(),
                pdftoppm_bin: "pdftoppm".to_string(),
                dpi: DEFAULT_DPI,
                candidates: DEFAULT_CANDIDATES.iter().map(|c| c.to_string()).collect(),
                oem: engine.oem,
                psm: engine.psm,
            },
            translation: TranslationConfig {
                providers: ProviderSettings::default(),
                chain: ChainConfig::default(),
            },
        }
    }
}

impl Config {
    /// Read configuration from the environment, falling back to defaults
    /// for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Config::default();
        let provider_defaults = defaults.translation.providers;
        let chain_defaults = defaults.translation.chain;

        Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SERVER_PORT", defaults.server.port),
                max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", defaults.server.max_upload_bytes),
            },
            ocr: OcrConfig {
                tesseract_bin: env::var("TESSERACT_BIN").unwrap_or(defaults.ocr.tesseract_bin),
                pdftoppm_bin: env::var("PDFTOPPM_BIN").unwrap_or(defaults.ocr.pdftoppm_bin),
                dpi: parse_var("OCR_DPI", defaults.ocr.dpi),
                candidates: env::var("OCR_CANDIDATES")
                    .ok()
                    .map(|v| parse_list(&v))
                    .filter(|list| !list.is_empty())
                    .unwrap_or(defaults.ocr.candidates),
                oem: parse_var("TESSERACT_OEM", defaults.ocr.oem),
                psm: parse_var("TESSERACT_PSM", defaults.ocr.psm),
            },
            translation: TranslationConfig {
                providers: ProviderSettings {
                    order: env::var("TRANSLATE_PROVIDERS")
                        .ok()
                        .map(|v| parse_providers(&v))
                        .filter(|order| !order.is_empty())
                        .unwrap_or(provider_defaults.order),
                    google_url: env::var("GOOGLE_TRANSLATE_URL").unwrap_or(provider_defaults.google_url),
                    mymemory_url: env::var("MYMEMORY_URL").unwrap_or(provider_defaults.mymemory_url),
                    mymemory_email: env::var("MYMEMORY_EMAIL").ok().filter(|v| !v.is_empty()),
                    libre_url: env::var("LIBRETRANSLATE_URL").unwrap_or(provider_defaults.libre_url),
                    libre_api_key: env::var("LIBRETRANSLATE_API_KEY").ok().filter(|v| !v.is_empty()),
                    timeout_secs: parse_var("TRANSLATE_TIMEOUT_SECS", provider_defaults.timeout_secs),
                },
                chain: ChainConfig {
                    max_input_chars: parse_var("TRANSLATE_MAX_INPUT_CHARS", chain_defaults.max_input_chars),
                    ..chain_defaults
                },
            },
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            oem: self.ocr.oem,
            psm: self.ocr.psm,
        }
    }

    pub fn selector_config(&self) -> OcrSelectorConfig {
        OcrSelectorConfig {
            candidates: self.ocr.candidates.clone(),
            dpi: self.ocr.dpi,
        }
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    env::var(name).ok().and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_providers(value: &str) -> Vec<ProviderKind> {
    parse_list(value)
        .iter()
        .filter_map(|name| {
            let kind = ProviderKind::parse(name);
            if kind.is_none() {
                tracing::warn!(provider = %name, "Ignoring unknown translation provider");
            }
            kind
        })
        .collect()
}
