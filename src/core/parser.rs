//! Line-oriented extraction of transfer listings from the decoded page text.
//!
//! The upstream page has no published schema, so every rule here is a
//! heuristic over its rendered text. All functions are pure: feed them a
//! stored fixture to diagnose layout drift without hitting the network.

use crate::config::toml_config::{ParseConfig, ID_PLACEHOLDER};
use crate::domain::model::{Group, Listing};
use crate::utils::error::{Result, ScoutError};
use regex::Regex;
use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;

static DEADLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{4}-\d{2}-\d{2}[ T]\d{2}:\d{2}(?::\d{2})?").expect("deadline pattern compiles")
});

// Grouped thousands at end of line, with an optional short currency suffix.
// The leading class keeps "12:00 300 000" from matching as "00 300 000".
static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\d:.,])(\d{1,3}(?:[ \u{a0}.,]\d{3})+)(?:\s*(?:€|£|\$|US\$|[A-Za-z]{1,4}))?\s*$")
        .expect("price pattern compiles")
});

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("number pattern compiles"));

// What may sit between the years and days numbers: "17 45", "17y 45d",
// "17 years and 45 days", "17, 45", "17/45".
static AGE_JOINER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:years?|yrs?|y)?\.?\s*(?:and|,|/|\+)?\s*$")
        .expect("age joiner pattern compiles")
});

// A bare years number right before a price candidate: "19 45 250 000".
static AGE_BEFORE_PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\d:.,])\d{1,2}\s+$").expect("age before price pattern compiles")
});

const NAME_TRIM: &[char] = &['-', '|', ',', ':', '·', '–', '—'];

// Stands in for removed deadline and price text so numbers on either side
// are never joined into one age.
const FIELD_BREAK: &str = " | ";

// A Hattrick year has 112 days.
const MAX_AGE_DAYS: u16 = 111;

#[derive(Debug, Clone)]
pub struct ParseRules {
    nationality: Regex,
    u21_heading: Regex,
    nt_heading: Regex,
    profile_url_template: String,
    min_id_digits: usize,
}

impl ParseRules {
    pub fn from_config(config: &ParseConfig) -> Result<Self> {
        let mut tokens: Vec<&str> = config
            .nationality_tokens
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.is_empty() {
            return Err(ScoutError::ConfigError {
                message: "parse.nationality_tokens must not be empty".to_string(),
            });
        }
        // longest first so "Cyprus (CY)" wins over "Cyprus" at the same position
        tokens.sort_by_key(|t| std::cmp::Reverse(t.len()));
        let alternation = tokens
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");

        Ok(Self {
            nationality: compile(
                "parse.nationality_tokens",
                &format!(r"(?i)(?:^|[^\p{{L}}\p{{N}}])({})(?:[^\p{{L}}\p{{N}}]|$)", alternation),
            )?,
            u21_heading: heading_regex("parse.u21_heading", &config.u21_heading)?,
            nt_heading: heading_regex("parse.nt_heading", &config.nt_heading)?,
            profile_url_template: config.profile_url_template.clone(),
            min_id_digits: config.min_id_digits.max(1),
        })
    }

    fn heading(&self, group: Group) -> &Regex {
        match group {
            Group::U21 => &self.u21_heading,
            Group::Nt => &self.nt_heading,
        }
    }

    pub fn profile_url(&self, ht_id: u64) -> String {
        self.profile_url_template
            .replace(ID_PLACEHOLDER, &ht_id.to_string())
    }
}

fn compile(field: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| ScoutError::ConfigValidationError {
        field: field.to_string(),
        message: e.to_string(),
    })
}

// Headings only count at the start of a line, so a nav bar that mentions
// both labels on one line does not cut the section short.
fn heading_regex(field: &str, heading: &str) -> Result<Regex> {
    let heading = heading.trim();
    if heading.is_empty() {
        return Err(ScoutError::ConfigError {
            message: format!("{} must not be empty", field),
        });
    }
    compile(
        field,
        &format!(r"(?im)^[ \t]*{}(?:\W|$)", regex::escape(heading)),
    )
}

/// Slice of `text` that belongs to `group`.
///
/// Runs from just after the group's heading to the start of the other
/// group's heading when that comes later, otherwise to the end of the text.
/// Without the group's heading the whole text is returned.
pub fn isolate_section<'a>(text: &'a str, group: Group, rules: &ParseRules) -> &'a str {
    let Some(start) = rules.heading(group).find(text) else {
        tracing::warn!(
            "Heading for '{}' not found, parsing the whole document",
            group
        );
        return text;
    };

    let rest = &text[start.end()..];
    match rules.heading(group.other()).find(rest) {
        Some(end) => &rest[..end.start()],
        None => rest,
    }
}

/// Parse one decoded line into a listing, or `None` when it is not a row of
/// the tracked nationality.
pub fn parse_line(line: &str, rules: &ParseRules) -> Option<Listing> {
    let line = line.trim();

    let id_len = line.bytes().take_while(u8::is_ascii_digit).count();
    if id_len < rules.min_id_digits {
        return None;
    }
    let rest = &line[id_len..];
    if rest.chars().next().is_some_and(char::is_alphanumeric) {
        return None;
    }
    let ht_id: u64 = line[..id_len].parse().ok()?;

    let nationality = rules.nationality.captures(rest)?.get(1)?;
    let name = rest[..nationality.start()]
        .trim()
        .trim_matches(NAME_TRIM)
        .trim()
        .to_string();
    let country = nationality.as_str().to_string();
    let tail = &rest[nationality.end()..];

    let deadline = DEADLINE_RE.find(line).map(|m| m.as_str().to_string());
    let price = find_price(tail);
    let asking_price = price.clone().map(|range| tail[range].to_string());

    let without_price = match price {
        Some(range) => format!("{}{}", &tail[..range.start], FIELD_BREAK),
        None => tail.to_string(),
    };
    let age_text = DEADLINE_RE.replace_all(&without_price, FIELD_BREAK);
    let (age_years, age_days) = parse_age(&age_text);

    Some(Listing {
        ht_id,
        name,
        country,
        age_years,
        age_days,
        deadline,
        asking_price,
        url: rules.profile_url(ht_id),
    })
}

/// Byte range of the asking price at the end of `tail`.
///
/// When the candidate opens with a short group right after a bare years
/// number, that group is the days half of the age pair and the price starts
/// at the next group.
fn find_price(tail: &str) -> Option<Range<usize>> {
    let found = PRICE_RE.captures(tail)?.get(1)?;
    let text = found.as_str();

    let lead = text.bytes().take_while(u8::is_ascii_digit).count();
    if lead <= 2 && AGE_BEFORE_PRICE_RE.is_match(&tail[..found.start()]) {
        let separator = text[lead..].chars().next().map_or(0, char::len_utf8);
        let remainder = &text[lead + separator..];
        let still_grouped = remainder.contains(|c: char| !c.is_ascii_digit());
        if still_grouped && remainder.starts_with(|c: char| ('1'..='9').contains(&c)) {
            return Some(found.start() + lead + separator..found.end());
        }
    }

    Some(found.range())
}

fn parse_age(text: &str) -> (Option<u8>, Option<u16>) {
    let mut numbers = NUMBER_RE.find_iter(text);
    let Some(years) = numbers.by_ref().find(|m| m.as_str().len() <= 2) else {
        return (None, None);
    };

    let days = numbers
        .next()
        .filter(|days| days.as_str().len() <= 3)
        .filter(|days| AGE_JOINER_RE.is_match(&text[years.end()..days.start()]))
        .and_then(|days| days.as_str().parse().ok())
        .filter(|days| *days <= MAX_AGE_DAYS);

    (years.as_str().parse().ok(), days)
}

/// Keep the first listing for every `ht_id`, preserving document order.
pub fn dedupe(listings: Vec<Listing>) -> Vec<Listing> {
    let mut seen = HashSet::new();
    listings
        .into_iter()
        .filter(|listing| seen.insert(listing.ht_id))
        .collect()
}

pub fn parse_listings(text: &str, group: Group, rules: &ParseRules) -> Vec<Listing> {
    let section = isolate_section(text, group, rules);
    let candidates: Vec<Listing> = section
        .lines()
        .filter_map(|line| parse_line(line, rules))
        .collect();
    let found = candidates.len();
    let listings = dedupe(candidates);

    tracing::debug!(
        "Section '{}': {} lines, {} candidate rows, {} after dedupe",
        group,
        section.lines().count(),
        found,
        listings.len()
    );

    listings
}
