//! Master-file parser covering the subset a hosting control panel emits

use std::net::{Ipv4Addr, Ipv6Addr};

use super::{ZoneFileError, ZoneFileParser};
use crate::normalize::quote_txt;
use crate::types::{LocalRecord, RecordData, RecordType};

/// DNS classes accepted (and ignored) in record lines.
const CLASSES: [&str; 4] = ["IN", "CH", "HS", "CS"];

/// Default zone-file parser.
///
/// Supports `;` comments, `$ORIGIN`, `$TTL`, `@`, relative owner names,
/// blank-owner continuation lines, TTL and class in either order,
/// parenthesized multi-line records and quoted TXT strings. `SOA` records
/// are skipped after their minimum TTL is noted; `$INCLUDE` is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicZoneParser;

impl BasicZoneParser {
    pub fn new() -> Self {
        Self
    }
}

impl ZoneFileParser for BasicZoneParser {
    fn parse(&self, zone: &str, text: &str) -> Result<Vec<LocalRecord>, ZoneFileError> {
        let mut state = ParseState::new(zone);
        let mut tokens = Vec::new();
        let mut depth = 0usize;
        let mut start_line = 0;
        let mut indented = false;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            if depth == 0 {
                start_line = line_no;
                indented = raw.starts_with([' ', '\t']);
                tokens.clear();
            }
            tokenize_line(raw, line_no, &mut depth, &mut tokens)?;
            if depth == 0 && !tokens.is_empty() {
                state.entry(start_line, indented, &tokens)?;
            }
        }

        if depth > 0 {
            return Err(ZoneFileError::new(start_line, "unbalanced '('"));
        }
        Ok(state.records)
    }
}

// ============ Tokenizer ============

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    text: String,
    quoted: bool,
}

impl Token {
    fn bare(text: String) -> Self {
        Self {
            text,
            quoted: false,
        }
    }
}

fn flush(current: &mut String, tokens: &mut Vec<Token>) {
    if !current.is_empty() {
        tokens.push(Token::bare(std::mem::take(current)));
    }
}

/// Split one physical line into tokens, tracking parenthesis depth.
fn tokenize_line(
    line: &str,
    line_no: usize,
    depth: &mut usize,
    tokens: &mut Vec<Token>,
) -> Result<(), ZoneFileError> {
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            ';' => break,
            '(' => {
                flush(&mut current, tokens);
                *depth += 1;
            }
            ')' => {
                flush(&mut current, tokens);
                if *depth == 0 {
                    return Err(ZoneFileError::new(line_no, "unbalanced ')'"));
                }
                *depth -= 1;
            }
            '"' => {
                flush(&mut current, tokens);
                let mut text = String::new();
                let mut closed = false;
                while let Some(q) = chars.next() {
                    match q {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                text.push(escaped);
                            }
                        }
                        _ => text.push(q),
                    }
                }
                if !closed {
                    return Err(ZoneFileError::new(line_no, "unterminated quoted string"));
                }
                tokens.push(Token { text, quoted: true });
            }
            c if c.is_whitespace() => flush(&mut current, tokens),
            c => current.push(c),
        }
    }
    flush(&mut current, tokens);
    Ok(())
}

// ============ TTL ============

/// Parse a TTL in seconds or BIND unit notation (`1h30m`, `2d`, `1W`).
pub(crate) fn parse_ttl(token: &str) -> Option<u32> {
    if !token.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    if let Ok(secs) = token.parse::<u32>() {
        return Some(secs);
    }

    let mut total: u32 = 0;
    let mut number: Option<u32> = None;
    for c in token.chars() {
        if let Some(digit) = c.to_digit(10) {
            number = Some(number.unwrap_or(0).checked_mul(10)?.checked_add(digit)?);
            continue;
        }
        let unit = match c.to_ascii_lowercase() {
            's' => 1,
            'm' => 60,
            'h' => 3_600,
            'd' => 86_400,
            'w' => 604_800,
            _ => return None,
        };
        total = total.checked_add(number.take()?.checked_mul(unit)?)?;
    }
    // Trailing digits without a unit are seconds
    match number {
        Some(n) => total.checked_add(n),
        None => Some(total),
    }
}

// ============ Record lines ============

struct ParseState {
    origin: String,
    default_ttl: Option<u32>,
    last_ttl: Option<u32>,
    last_owner: Option<String>,
    records: Vec<LocalRecord>,
}

impl ParseState {
    fn new(zone: &str) -> Self {
        Self {
            origin: format!("{}.", zone.trim().trim_end_matches('.')),
            default_ttl: None,
            last_ttl: None,
            last_owner: None,
            records: Vec::new(),
        }
    }

    /// Resolve a name against the current origin; result ends with a dot.
    fn absolute(&self, name: &str) -> String {
        if name == "@" {
            self.origin.clone()
        } else if name.ends_with('.') {
            name.to_string()
        } else {
            format!("{name}.{}", self.origin)
        }
    }

    /// Absolute host name without the trailing dot, as stored in [`RecordData`].
    fn host(&self, name: &str) -> String {
        self.absolute(name).trim_end_matches('.').to_string()
    }

    fn entry(&mut self, line: usize, indented: bool, tokens: &[Token]) -> Result<(), ZoneFileError> {
        let first = &tokens[0];
        if !first.quoted && first.text.starts_with('$') {
            return self.directive(line, tokens);
        }

        let mut rest = tokens;
        let owner = if indented {
            self.last_owner
                .clone()
                .ok_or_else(|| ZoneFileError::new(line, "record has no owner name"))?
        } else {
            rest = &tokens[1..];
            self.absolute(&first.text)
        };

        // Up to one TTL and one class, in either order
        let mut ttl = None;
        let mut class_seen = false;
        while let Some(token) = rest.first() {
            if !class_seen && CLASSES.iter().any(|c| c.eq_ignore_ascii_case(&token.text)) {
                class_seen = true;
            } else if ttl.is_none() && parse_ttl(&token.text).is_some() {
                ttl = parse_ttl(&token.text);
            } else {
                break;
            }
            rest = &rest[1..];
        }

        let Some((type_token, rdata)) = rest.split_first() else {
            return Err(ZoneFileError::new(line, "missing record type"));
        };
        let type_name = type_token.text.to_ascii_uppercase();
        self.last_owner = Some(owner.clone());

        if type_name == "SOA" {
            self.soa(line, rdata)?;
            if let Some(value) = ttl {
                self.last_ttl = Some(value);
            }
            return Ok(());
        }

        let ttl = match ttl {
            Some(value) => {
                self.last_ttl = Some(value);
                value
            }
            None => self
                .default_ttl
                .or(self.last_ttl)
                .ok_or_else(|| ZoneFileError::new(line, "no TTL given and no $TTL in effect"))?,
        };

        let data = self.record_data(line, &type_name, rdata)?;
        self.records.push(LocalRecord::new(owner, ttl, data));
        Ok(())
    }

    fn directive(&mut self, line: usize, tokens: &[Token]) -> Result<(), ZoneFileError> {
        let name = tokens[0].text.to_ascii_uppercase();
        let arg = tokens
            .get(1)
            .map(|t| t.text.as_str())
            .ok_or_else(|| ZoneFileError::new(line, format!("{name} requires an argument")))?;
        match name.as_str() {
            "$ORIGIN" => {
                self.origin = self.absolute(arg);
                Ok(())
            }
            "$TTL" => {
                let ttl = parse_ttl(arg)
                    .ok_or_else(|| ZoneFileError::new(line, format!("invalid TTL '{arg}'")))?;
                self.default_ttl = Some(ttl);
                Ok(())
            }
            "$INCLUDE" => Err(ZoneFileError::new(line, "$INCLUDE is not supported")),
            _ => Err(ZoneFileError::new(line, format!("unknown directive {name}"))),
        }
    }

    /// SOA is not synchronized; only its minimum TTL is used as a fallback default.
    fn soa(&mut self, line: usize, rdata: &[Token]) -> Result<(), ZoneFileError> {
        if rdata.len() != 7 {
            return Err(ZoneFileError::new(
                line,
                format!("SOA record needs 7 fields, found {}", rdata.len()),
            ));
        }
        let minimum = parse_ttl(&rdata[6].text)
            .ok_or_else(|| ZoneFileError::new(line, "invalid SOA minimum TTL"))?;
        if self.default_ttl.is_none() {
            self.default_ttl = Some(minimum);
        }
        Ok(())
    }

    fn record_data(
        &self,
        line: usize,
        type_name: &str,
        rdata: &[Token],
    ) -> Result<RecordData, ZoneFileError> {
        let Some(record_type) = RecordType::parse(type_name) else {
            let rdata = rdata
                .iter()
                .map(|t| if t.quoted { quote_txt(&t.text) } else { t.text.clone() })
                .collect::<Vec<_>>()
                .join(" ");
            return Ok(RecordData::Other {
                record_type: type_name.to_string(),
                rdata,
            });
        };

        let expected = match record_type {
            RecordType::A | RecordType::Aaaa | RecordType::Cname | RecordType::Ns => Some(1),
            RecordType::Mx => Some(2),
            RecordType::Srv => Some(4),
            RecordType::Txt => None,
        };
        match expected {
            Some(n) if rdata.len() != n => {
                return Err(ZoneFileError::new(
                    line,
                    format!("{record_type} record needs {n} field(s), found {}", rdata.len()),
                ));
            }
            None if rdata.is_empty() => {
                return Err(ZoneFileError::new(line, "TXT record has no text"));
            }
            _ => {}
        }

        let number = |token: &Token, what: &str| {
            token.text.parse::<u16>().map_err(|_| {
                ZoneFileError::new(line, format!("invalid {record_type} {what} '{}'", token.text))
            })
        };

        let data = match record_type {
            RecordType::A => {
                let address = rdata[0].text.parse::<Ipv4Addr>().map_err(|_| {
                    ZoneFileError::new(line, format!("invalid IPv4 address '{}'", rdata[0].text))
                })?;
                RecordData::A {
                    address: address.to_string(),
                }
            }
            RecordType::Aaaa => {
                let address = rdata[0].text.parse::<Ipv6Addr>().map_err(|_| {
                    ZoneFileError::new(line, format!("invalid IPv6 address '{}'", rdata[0].text))
                })?;
                RecordData::Aaaa {
                    address: address.to_string(),
                }
            }
            RecordType::Cname => RecordData::Cname {
                target: self.host(&rdata[0].text),
            },
            RecordType::Ns => RecordData::Ns {
                host: self.host(&rdata[0].text),
            },
            RecordType::Mx => RecordData::Mx {
                preference: number(&rdata[0], "preference")?,
                exchange: self.host(&rdata[1].text),
            },
            RecordType::Srv => RecordData::Srv {
                priority: number(&rdata[0], "priority")?,
                weight: number(&rdata[1], "weight")?,
                port: number(&rdata[2], "port")?,
                target: self.host(&rdata[3].text),
            },
            RecordType::Txt => RecordData::Txt {
                text: rdata.iter().map(|t| t.text.as_str()).collect(),
            },
        };
        Ok(data)
    }
}
