//! Form input collected from the command line.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Args;
use herbarium::form::{FileEntry, FormData, FormValue};

/// Submitted form entries, given inline or read from url-encoded files.
#[derive(Args, Debug, Clone, Default)]
pub struct FormArgs {
    /// Form entry as KEY=VALUE; KEY=@PATH attaches the file at PATH
    #[arg(short = 'f', long = "field", value_name = "KEY=VALUE")]
    pub fields: Vec<String>,

    /// URL-encoded form body to read, `-` for stdin; repeat to submit several forms
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    pub inputs: Vec<PathBuf>,
}

impl FormArgs {
    /// One form per `--input`, followed by the `--field` entries as a final form.
    pub fn load(&self) -> Result<Vec<FormData>> {
        let mut forms = Vec::with_capacity(self.inputs.len() + 1);
        for path in &self.inputs {
            forms.push(read_urlencoded(path)?);
        }

        let mut inline = FormData::new();
        for raw in &self.fields {
            let (key, value) = parse_field_arg(raw)?;
            inline.append(key, value);
        }
        if !inline.is_empty() || forms.is_empty() {
            forms.push(inline);
        }

        log::debug!("loaded {} form(s) from the command line", forms.len());
        Ok(forms)
    }
}

fn read_urlencoded(path: &Path) -> Result<FormData> {
    let body = if path.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read form from stdin")?;
        buffer
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read form from {}", path.display()))?
    };
    Ok(FormData::from_urlencoded(body.trim_end_matches(['\r', '\n'])))
}

/// Split `KEY=VALUE`. A value of `@PATH` becomes a file entry.
pub fn parse_field_arg(raw: &str) -> Result<(String, FormValue)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("Invalid field `{raw}`: expected KEY=VALUE");
    };
    if key.is_empty() {
        bail!("Invalid field `{raw}`: key is empty");
    }

    let Some(path) = value.strip_prefix('@').filter(|path| !path.is_empty()) else {
        return Ok((key.to_string(), FormValue::from(value)));
    };

    let path = Path::new(path);
    let bytes = fs::read(path).with_context(|| format!("Failed to read attachment {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok((key.to_string(), FormValue::File(FileEntry::new(file_name, bytes))))
}
