//! Personality questionnaire: the fixed statements, the response scale and
//! the answers a respondent gives.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Serialize;

/// Statements in presentation order. Position defines the question index.
pub const QUESTIONS: [&str; 32] = [
    "Zůstávám klidný i v náročných situacích.",
    "Dokážu se rychle vzpamatovat z neúspěchu.",
    "Snadno zvládám stres a tlak termínů.",
    "Neberu si věci příliš osobně.",
    "I při problémech si udržuji pozitivní přístup.",
    "Mám silnou potřebu dosahovat vysokých cílů.",
    "Usiluji o to být v práci vidět a prosadit se.",
    "Přirozeně přebírám roli lídra, když je to potřeba.",
    "Soutěživost mě motivuje k lepším výkonům.",
    "Mám rád, když jsou výsledky mé práce uznány a oceněny.",
    "Rád trávím čas mezi lidmi a poznávám nové kolegy.",
    "Snadno navazuji neformální konverzaci.",
    "Cítím se dobře na společenských akcích a setkáních.",
    "Často vyhledávám příležitosti k týmové spolupráci.",
    "Sdílení nápadů s ostatními mi dodává energii.",
    "Naslouchám druhým a zajímám se o jejich názory.",
    "Dávám pozor, abych svým jednáním neurazil ostatní.",
    "Snažím se vycházet dobře s různými typy lidí.",
    "Dokážu se vcítit do situace druhých.",
    "Jsem diplomatický/á i v konfliktních situacích.",
    "Dodržuji termíny a závazky.",
    "Plánuji si práci tak, aby byla efektivní a přehledná.",
    "Jsem důsledný/á v dokončování úkolů.",
    "Mám rád/a jasně stanovená pravidla a procesy.",
    "Připravuji se pečlivě na schůzky a prezentace.",
    "Zajímám se o nové přístupy a metody.",
    "Často přicházím s originálními nápady.",
    "Rád/a zkoumám, jak by šly věci dělat jinak.",
    "Inovace v práci mě motivují.",
    "Učím se z experimentování a hledání nových cest.",
    "Pravidelně si rozšiřuji znalosti v oboru.",
    "Rád/a čtu odborné články, knihy nebo sleduji kurzy.",
];

/// Response scale, strongest agreement first.
pub const RESPONSE_OPTIONS: [&str; 4] = [
    "Souhlasím",
    "Trochu souhlasím",
    "Trochu nesouhlasím",
    "Nesouhlasím",
];

/// Who the consultation letter is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Role {
    Employee,
    Manager,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Manager => "manager",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "employee" => Ok(Self::Employee),
            "manager" => Ok(Self::Manager),
            other => Err(format!(
                "Invalid role '{other}'. Supported values: employee, manager."
            )),
        }
    }
}

/// One answered question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub question_index: usize,
    pub question: String,
    pub answer: String,
}

/// Entry as embedded into the consultation prompt.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NumberedAnswer<'a> {
    pub id: usize,
    pub question: &'a str,
    pub answer: &'a str,
}

/// Answers keyed by 0-based question index. The order in which answers are
/// recorded does not matter.
#[derive(Debug, Clone, Default)]
pub struct AnswerSheet {
    responses: BTreeMap<usize, String>,
}

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records (or replaces) the answer for a question.
    pub fn record(&mut self, question_index: usize, label: impl Into<String>) -> Result<(), String> {
        if question_index >= QUESTIONS.len() {
            return Err(format!(
                "Question {} does not exist. The questionnaire has {} questions.",
                question_index + 1,
                QUESTIONS.len()
            ));
        }
        self.responses.insert(question_index, label.into());
        Ok(())
    }

    /// Answered questions in questionnaire order, blanks skipped.
    pub fn answers(&self) -> Vec<Answer> {
        self.responses
            .iter()
            .filter(|(_, label)| !label.trim().is_empty())
            .map(|(&question_index, label)| Answer {
                question_index,
                question: QUESTIONS[question_index].to_string(),
                answer: label.clone(),
            })
            .collect()
    }

    pub fn answered(&self) -> usize {
        self.responses
            .values()
            .filter(|label| !label.trim().is_empty())
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.answered() == QUESTIONS.len()
    }
}

/// Maps a label or a 1-based scale position to the canonical scale label.
pub fn resolve_option(input: &str) -> Option<&'static str> {
    let input = input.trim();
    if let Ok(position) = input.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|index| RESPONSE_OPTIONS.get(index))
            .copied();
    }
    RESPONSE_OPTIONS
        .iter()
        .find(|option| option.to_lowercase() == input.to_lowercase())
        .copied()
}

/// Drops blank answers and numbers the rest 1..n in questionnaire order,
/// whatever order `answers` arrives in.
pub fn numbered(answers: &[Answer]) -> Vec<NumberedAnswer<'_>> {
    let mut kept = answers
        .iter()
        .filter(|answer| !answer.answer.trim().is_empty())
        .collect::<Vec<_>>();
    kept.sort_by_key(|answer| answer.question_index);
    kept.into_iter()
        .enumerate()
        .map(|(position, answer)| NumberedAnswer {
            id: position + 1,
            question: &answer.question,
            answer: &answer.answer,
        })
        .collect()
}
