//! Fixed phrase table applied after glossary substitution

use regex::{Regex, RegexBuilder};

const HEADING_PHRASES: &[(&str, &str)] = &[
    ("Getting Started", "はじめに"),
    ("Quick Start", "クイックスタート"),
    ("Installation", "インストール"),
    ("Configuration", "設定"),
    ("Documentation", "ドキュメント"),
    ("Examples", "例"),
    ("Tutorial", "チュートリアル"),
    ("Guide", "ガイド"),
    ("Overview", "概要"),
    ("Features", "機能"),
    ("How to use", "使用方法"),
    ("Step by step", "ステップバイステップ"),
    ("Prerequisites", "前提条件"),
    ("Requirements", "要件"),
    ("Dependencies", "依存関係"),
    ("License", "ライセンス"),
    ("Contributing", "貢献"),
    ("Issues", "課題"),
    ("Feedback", "フィードバック"),
    ("Support", "サポート"),
];

pub struct PhraseTable {
    headings: Vec<(Regex, &'static str)>,
    sentences: Vec<(Regex, &'static str)>,
}

impl Default for PhraseTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PhraseTable {
    pub fn new() -> Self {
        let headings = HEADING_PHRASES
            .iter()
            .map(|(english, japanese)| {
                let pattern = RegexBuilder::new(&format!(r"(?-u:\b){}(?-u:\b)", regex::escape(english)))
                    .case_insensitive(true)
                    .build()
                    .unwrap();
                (pattern, *japanese)
            })
            .collect();

        // Sentence rewrites are case-sensitive
        let sentences = vec![
            (Regex::new(r"This is an? ([^.]+)\.").unwrap(), "これは${1}です。"),
            (Regex::new(r"You can ([^.]+)\.").unwrap(), "${1}することができます。"),
        ];

        Self {
            headings,
            sentences,
        }
    }

    pub fn apply(&self, text: &str) -> String {
        let mut result = text.to_string();
        for (pattern, japanese) in &self.headings {
            result = pattern
                .replace_all(&result, regex::NoExpand(japanese))
                .into_owned();
        }
        for (pattern, replacement) in &self.sentences {
            result = pattern.replace_all(&result, *replacement).into_owned();
        }
        result
    }
}
