use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nutrilens_core::domain::common::{
    DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_TEXT_MODEL,
    DEFAULT_OCR_LANGUAGE, LLMConfig, NutrilensConfig, OcrConfig,
};

#[derive(Debug, Clone, Parser)]
#[command(name = "nutrilens", version, about = "Analyze food and medication photos")]
pub struct Args {
    #[command(flatten)]
    pub llm: LlmArgs,

    #[command(flatten)]
    pub ocr: OcrArgs,

    #[command(flatten)]
    pub log: LogArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Read a medication label into a structured record
    Medication {
        /// Path to a JPEG photo of the label
        image: PathBuf,
    },
    /// Describe the food in a photo
    Food {
        /// Path to a JPEG photo of the meal
        image: PathBuf,
    },
}

#[derive(Clone, clap::Args)]
pub struct LlmArgs {
    #[arg(long = "gemini-api-key", env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: String,

    #[arg(long = "gemini-model", env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    pub model: String,

    #[arg(
        long = "gemini-text-model",
        env = "GEMINI_TEXT_MODEL",
        default_value = DEFAULT_GEMINI_TEXT_MODEL
    )]
    pub text_model: String,

    #[arg(
        long = "gemini-base-url",
        env = "GEMINI_BASE_URL",
        default_value = DEFAULT_GEMINI_BASE_URL
    )]
    pub base_url: String,
}

// Args are logged at startup; keep the key out of them.
impl std::fmt::Debug for LlmArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmArgs")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("text_model", &self.text_model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct OcrArgs {
    #[arg(long = "ocr-language", env = "OCR_LANGUAGE", default_value = DEFAULT_OCR_LANGUAGE)]
    pub language: String,

    #[arg(long = "tessdata", env = "TESSDATA_PREFIX")]
    pub data_path: Option<String>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct LogArgs {
    #[arg(long = "log-filter", env = "LOG_FILTER", default_value = "info")]
    pub filter: String,

    /// Emit logs as JSON lines
    #[arg(long = "log-json", env = "LOG_JSON", default_value_t = false)]
    pub json: bool,
}

impl From<Args> for NutrilensConfig {
    fn from(args: Args) -> Self {
        NutrilensConfig {
            llm: LLMConfig {
                gemini_api_key: args.llm.api_key,
                gemini_model: args.llm.model,
                gemini_text_model: args.llm.text_model,
                gemini_base_url: args.llm.base_url,
            },
            ocr: OcrConfig {
                language: args.ocr.language,
                data_path: args.ocr.data_path,
            },
        }
    }
}
