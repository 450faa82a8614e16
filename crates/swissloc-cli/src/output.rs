//! # Output Formats
//!
//! Every query subcommand prints either a human-readable text block or
//! the serialized entities. Serialized output goes through the entities'
//! `Serialize` impls, so references appear as identifiers.

use std::io::Write;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

/// How results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Render `value`; `text` renders the text form.
    pub fn render<T: Serialize + ?Sized>(
        self,
        value: &T,
        text: impl FnOnce() -> String,
    ) -> Result<String> {
        match self {
            Self::Text => Ok(text()),
            Self::Json => {
                let mut s = serde_json::to_string_pretty(value).context("serializing JSON output")?;
                s.push('\n');
                Ok(s)
            }
            Self::Yaml => serde_yaml::to_string(value).context("serializing YAML output"),
        }
    }

    /// Render `value` to standard output.
    pub fn emit<T: Serialize + ?Sized>(
        self,
        value: &T,
        text: impl FnOnce() -> String,
    ) -> Result<()> {
        let rendered = self.render(value, text)?;
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(rendered.as_bytes())
            .context("writing to standard output")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        code: u16,
        name: &'static str,
    }

    const SAMPLE: Sample = Sample {
        code: 8001,
        name: "Zürich",
    };

    #[test]
    fn text_uses_the_closure() {
        let out = OutputFormat::Text
            .render(&SAMPLE, || "8001 Zürich\n".to_string())
            .unwrap();
        assert_eq!(out, "8001 Zürich\n");
    }

    #[test]
    fn json_and_yaml() {
        let json = OutputFormat::Json.render(&SAMPLE, String::new).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["code"], 8001);
        assert_eq!(parsed["name"], "Zürich");

        let yaml = OutputFormat::Yaml.render(&SAMPLE, String::new).unwrap();
        assert!(yaml.contains("code: 8001"));
    }
}
