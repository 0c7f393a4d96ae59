//! Reader for `.env` files.
//!
//! Lines are `KEY=VALUE`, optionally prefixed with `export `. Blank lines and
//! lines starting with `#` are ignored.
//!
//! Unquoted values are taken literally: backslashes are kept as-is, and a
//! `#` only starts a comment when whitespace precedes it. Single-quoted
//! values only unescape `\\` and `\'`. Double-quoted values also understand
//! `\n`, `\r`, `\t` and `\"`. Lines that cannot be parsed are logged and
//! skipped.

use std::{io, path::Path};

/// Read `path` into key/value pairs. A missing file yields no pairs.
pub fn read(path: &Path) -> io::Result<config::Map<String, String>> {
  match std::fs::read_to_string(path) {
    Ok(contents) => Ok(parse(&contents)),
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      tracing::debug!(path = %path.display(), "no env file");
      Ok(config::Map::new())
    }
    Err(e) => Err(e),
  }
}

pub fn parse(contents: &str) -> config::Map<String, String> {
  let mut pairs = config::Map::new();
  for (index, line) in contents.lines().enumerate() {
    match parse_line(line) {
      Ok(Some((key, value))) => {
        pairs.insert(key.to_string(), value);
      }
      Ok(None) => {}
      Err(reason) => {
        tracing::warn!(line = index + 1, reason, "skipping env file line");
      }
    }
  }
  pairs
}

fn parse_line(line: &str) -> Result<Option<(&str, String)>, &'static str> {
  let line = line.trim();
  if line.is_empty() || line.starts_with('#') {
    return Ok(None);
  }
  let line = line.strip_prefix("export ").map_or(line, str::trim_start);

  let (key, raw) = line.split_once('=').ok_or("missing `=`")?;
  let key = key.trim();
  if key.is_empty() {
    return Err("empty key");
  }

  let raw = raw.trim_start();
  let value = match raw.chars().next() {
    Some(quote @ ('\'' | '"')) => unquote(&raw[1..], quote)?,
    _ => strip_comment(raw).trim_end().to_string(),
  };
  Ok(Some((key, value)))
}

/// Everything before the first `#` that follows whitespace.
fn strip_comment(raw: &str) -> &str {
  let mut previous = None;
  for (index, c) in raw.char_indices() {
    if c == '#' && previous.is_some_and(char::is_whitespace) {
      return &raw[..index];
    }
    previous = Some(c);
  }
  raw
}

/// Decode a quoted value up to its closing `quote`. Anything after the
/// closing quote must be blank or a comment.
fn unquote(body: &str, quote: char) -> Result<String, &'static str> {
  let mut value = String::new();
  let mut chars = body.char_indices();

  while let Some((index, c)) = chars.next() {
    match c {
      '\\' => {
        let Some((_, next)) = chars.next() else {
          return Err("unterminated quoted value");
        };
        match (quote, next) {
          (_, '\\') => value.push('\\'),
          (_, c) if c == quote => value.push(c),
          ('"', 'n') => value.push('\n'),
          ('"', 'r') => value.push('\r'),
          ('"', 't') => value.push('\t'),
          (_, other) => {
            value.push('\\');
            value.push(other);
          }
        }
      }
      c if c == quote => {
        let rest = body[index + c.len_utf8()..].trim_start();
        if rest.is_empty() || rest.starts_with('#') {
          return Ok(value);
        }
        return Err("trailing characters after quoted value");
      }
      c => value.push(c),
    }
  }
  Err("unterminated quoted value")
}
