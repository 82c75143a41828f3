//! Loader for `cppcheck --dump` output.
//!
//! A dump holds one `<dump cfg="...">` section per preprocessor configuration.
//! Each section is turned into a [`Configuration`] whose symbols reference
//! tokens by id; ids are resolved to positions once, at load time.

use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::{AccessLevel, FunctionKind, Position, Symbol, SymbolModelView};

/// File extension of dump files.
pub const DUMP_EXTENSION: &str = "dump";

/// Errors raised while reading a dump file.
#[derive(Error, Debug)]
pub enum DumpError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("invalid XML attribute: {0}")]
    Attr(#[from] AttrError),
    #[error("malformed dump: {0}")]
    Malformed(String),
}

/// A parsed dump file.
#[derive(Debug, Clone)]
pub struct DumpFile {
    pub path: PathBuf,
    pub configurations: Vec<Configuration>,
}

impl DumpFile {
    /// Read and parse a dump file from disk.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, DumpError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| DumpError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(path, &content)
    }

    /// Parse dump content; `path` is only used for labelling.
    pub fn parse_str<P: AsRef<Path>>(path: P, content: &str) -> Result<Self, DumpError> {
        let path = path.as_ref().to_path_buf();
        let raw = RawDump::read(content)?;
        let label = path.display().to_string();

        let configurations = raw
            .configurations
            .into_iter()
            .map(|cfg| cfg.resolve(&label, &raw.files))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            path,
            configurations,
        })
    }
}

/// Check whether a path names a dump file.
pub fn is_dump_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(DUMP_EXTENSION)
}

/// Symbols of one preprocessor configuration.
#[derive(Debug, Clone)]
pub struct Configuration {
    /// The `cfg` attribute; empty for the default configuration.
    pub name: String,
    pub symbols: Vec<Symbol>,
    label: String,
}

impl SymbolModelView for Configuration {
    fn name(&self) -> &str {
        &self.label
    }

    fn symbols(&self) -> Box<dyn Iterator<Item = Symbol> + '_> {
        Box::new(self.symbols.iter().cloned())
    }
}

#[derive(Debug)]
struct RawToken {
    text: String,
    file: Option<String>,
    file_index: Option<usize>,
    line: u32,
    column: u32,
}

#[derive(Debug)]
struct RawVariable {
    name_token: Option<String>,
    type_start_token: Option<String>,
    access: AccessLevel,
    is_const: bool,
}

#[derive(Debug)]
struct RawClass {
    name: String,
    body_start: Option<String>,
}

#[derive(Debug)]
struct RawFunction {
    name: String,
    token_def: Option<String>,
    kind: FunctionKind,
}

#[derive(Debug, Default)]
struct RawConfiguration {
    name: String,
    tokens: HashMap<String, RawToken>,
    variables: Vec<RawVariable>,
    classes: Vec<RawClass>,
    functions: Vec<RawFunction>,
}

#[derive(Debug, Default)]
struct RawDump {
    files: HashMap<usize, String>,
    configurations: Vec<RawConfiguration>,
}

impl RawDump {
    fn read(content: &str) -> Result<Self, DumpError> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);

        let mut dump = RawDump::default();
        let mut current: Option<RawConfiguration> = None;
        let mut in_variables = false;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    match e.name().as_ref() {
                        b"dump" => {
                            let attrs = attributes(&e)?;
                            current = Some(RawConfiguration {
                                name: attrs.get("cfg").cloned().unwrap_or_default(),
                                ..Default::default()
                            });
                        }
                        b"variables" => in_variables = true,
                        _ => dump.element(&e, current.as_mut(), in_variables)?,
                    }
                }
                Event::Empty(e) => {
                    if e.name().as_ref() == b"dump" {
                        let attrs = attributes(&e)?;
                        dump.configurations.push(RawConfiguration {
                            name: attrs.get("cfg").cloned().unwrap_or_default(),
                            ..Default::default()
                        });
                    } else {
                        dump.element(&e, current.as_mut(), in_variables)?;
                    }
                }
                Event::End(e) => match e.name().as_ref() {
                    b"dump" => {
                        if let Some(cfg) = current.take() {
                            dump.configurations.push(cfg);
                        }
                    }
                    b"variables" => in_variables = false,
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        if current.is_some() {
            return Err(DumpError::Malformed("unterminated <dump> element".to_string()));
        }
        Ok(dump)
    }

    /// Record an element that may carry model data.
    fn element(
        &mut self,
        e: &BytesStart<'_>,
        current: Option<&mut RawConfiguration>,
        in_variables: bool,
    ) -> Result<(), DumpError> {
        let name = e.name();
        let tag = name.as_ref();

        // The file table may sit outside any <dump> section.
        if tag == b"file" {
            let attrs = attributes(e)?;
            if let (Some(index), Some(file)) = (attrs.get("index"), attrs.get("name")) {
                let index = parse_number(index, "file index")?;
                self.files.insert(index, file.clone());
            }
            return Ok(());
        }

        let Some(cfg) = current else {
            return Ok(());
        };

        match tag {
            b"token" => {
                let mut attrs = attributes(e)?;
                let id = attrs
                    .remove("id")
                    .ok_or_else(|| DumpError::Malformed("token without id".to_string()))?;
                let line = attrs
                    .get("linenr")
                    .ok_or_else(|| DumpError::Malformed(format!("token {id} without linenr")))?;
                let token = RawToken {
                    line: parse_number(line, "linenr")?,
                    column: attrs
                        .get("column")
                        .map(|c| parse_number(c, "column"))
                        .transpose()?
                        .unwrap_or(0),
                    file_index: attrs
                        .get("fileIndex")
                        .map(|i| parse_number(i, "fileIndex"))
                        .transpose()?,
                    text: attrs.remove("str").unwrap_or_default(),
                    file: attrs.remove("file"),
                };
                cfg.tokens.insert(id, token);
            }
            b"var" if in_variables => {
                let mut attrs = attributes(e)?;
                cfg.variables.push(RawVariable {
                    name_token: attrs.remove("nameToken"),
                    type_start_token: attrs.remove("typeStartToken"),
                    access: attrs
                        .get("access")
                        .map(|a| AccessLevel::parse(a))
                        .unwrap_or(AccessLevel::None),
                    is_const: attrs.get("isConst").map(String::as_str) == Some("true"),
                });
            }
            b"scope" => {
                let mut attrs = attributes(e)?;
                if attrs.get("type").map(String::as_str) == Some("Class") {
                    cfg.classes.push(RawClass {
                        name: attrs.remove("className").unwrap_or_default(),
                        body_start: attrs.remove("bodyStart"),
                    });
                }
            }
            b"function" => {
                let mut attrs = attributes(e)?;
                // Entries without a name are references, not declarations.
                if let Some(name) = attrs.remove("name") {
                    let kind = match attrs.get("type").map(String::as_str) {
                        Some("OperatorEqual") => FunctionKind::OperatorAssignment,
                        _ => FunctionKind::Other,
                    };
                    cfg.functions.push(RawFunction {
                        name,
                        token_def: attrs.remove("tokenDef"),
                        kind,
                    });
                }
            }
            _ => {}
        }
        Ok(())
    }
}

impl RawConfiguration {
    fn resolve(self, dump_label: &str, files: &HashMap<usize, String>) -> Result<Configuration, DumpError> {
        let label = if self.name.is_empty() {
            dump_label.to_string()
        } else {
            format!("{} [{}]", dump_label, self.name)
        };

        let mut symbols = Vec::new();

        for var in &self.variables {
            let Some((token, name_pos)) = self.position(var.name_token.as_ref(), files)? else {
                // Unnamed parameters and the like.
                continue;
            };
            let type_pos = self.position(var.type_start_token.as_ref(), files)?
                .map(|(_, p)| p)
                .unwrap_or_else(|| name_pos.clone());
            symbols.push(
                Symbol::variable(token.text.clone(), name_pos, var.access, var.is_const)
                    .with_type_position(type_pos),
            );
        }

        for class in &self.classes {
            match self.position(class.body_start.as_ref(), files)? {
                Some((_, pos)) => symbols.push(Symbol::class(class.name.clone(), pos)),
                None => tracing::warn!(
                    model = %label,
                    class = %class.name,
                    "class body start not found in token list, skipping"
                ),
            }
        }

        for function in &self.functions {
            match self.position(function.token_def.as_ref(), files)? {
                Some((_, pos)) => {
                    symbols.push(Symbol::function(function.name.clone(), pos, function.kind))
                }
                None => tracing::warn!(
                    model = %label,
                    function = %function.name,
                    "function definition token not found in token list, skipping"
                ),
            }
        }

        tracing::debug!(
            model = %label,
            tokens = self.tokens.len(),
            symbols = symbols.len(),
            "loaded configuration"
        );

        Ok(Configuration {
            name: self.name,
            symbols,
            label,
        })
    }

    /// Resolve a token id to the token and its position. Unknown ids yield `None`.
    fn position(
        &self,
        id: Option<&String>,
        files: &HashMap<usize, String>,
    ) -> Result<Option<(&RawToken, Position)>, DumpError> {
        let Some(token) = id.and_then(|id| self.tokens.get(id)) else {
            return Ok(None);
        };
        let file = match (&token.file, token.file_index) {
            (Some(file), _) => file.clone(),
            (None, Some(index)) => files
                .get(&index)
                .cloned()
                .ok_or_else(|| DumpError::Malformed(format!("unknown fileIndex {index}")))?,
            (None, None) => {
                return Err(DumpError::Malformed(format!(
                    "token {:?} has no file",
                    token.text
                )))
            }
        };
        Ok(Some((token, Position::new(file, token.line, token.column))))
    }
}

fn attributes(e: &BytesStart<'_>) -> Result<HashMap<String, String>, DumpError> {
    let mut map = HashMap::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        map.insert(key, value);
    }
    Ok(map)
}

fn parse_number<T: std::str::FromStr>(s: &str, what: &str) -> Result<T, DumpError> {
    s.parse()
        .map_err(|_| DumpError::Malformed(format!("invalid {what} {s:?}")))
}
