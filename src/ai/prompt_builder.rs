use std::fmt::Write as _;

use crate::core::models::Article;

/// Max characters of any single article field placed in the prompt
pub const MAX_FIELD_LEN: usize = 1200;

/// Fixed narrative voice used for every generated script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Persona {
    /// Reporter name shown in the prompt and the message footer.
    pub name: &'static str,
    /// Display name of the feed being reported on.
    pub feed_name: &'static str,
    pub voice_rules: &'static [&'static str],
}

pub const CHUNSIK: Persona = Persona {
    name: "춘식이",
    feed_name: "GeekNews",
    voice_rules: &[
        "춘식이 말투 사용 (\"~이에요\", \"~대요\", \"~네요\", \"~래요\" 등)",
        "각 기사마다 구두로 말하는 것처럼 자연스럽게 작성",
        "이모티콘 사용 금지",
        "기사의 핵심 내용을 포함하되 친근하고 이해하기 쉽게 설명",
    ],
};

/// Remove control characters and hard-truncate text coming from the feed.
pub fn sanitize_field(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .take(MAX_FIELD_LEN)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Build the single user message sent to the model for a batch.
#[must_use]
pub fn build_prompt(articles: &[Article], persona: &Persona) -> String {
    let mut articles_text = String::new();
    for (i, article) in articles.iter().enumerate() {
        let _ = writeln!(articles_text, "\n## 기사 {}", i + 1);
        let _ = writeln!(articles_text, "제목: {}", sanitize_field(&article.title));
        let _ = writeln!(articles_text, "링크: {}", sanitize_field(&article.link));
        let _ = writeln!(articles_text, "내용: {}", sanitize_field(&article.raw_summary));
        articles_text.push_str("---\n");
    }

    let count = articles.len();
    let mut rules = String::new();
    for (i, rule) in persona.voice_rules.iter().enumerate() {
        let _ = writeln!(rules, "{}. {}", i + 1, rule);
    }
    let _ = writeln!(
        rules,
        "{}. 기사 {}개 각각에 대해 주어진 순서대로 정확히 하나씩 작성하고, number와 link는 입력 그대로 사용",
        persona.voice_rules.len() + 1,
        count
    );

    format!(
        r#"다음은 {feed}의 최신 기사 {count}개입니다.
{articles_text}
각 기사를 {name} 캐릭터의 말투로 리포팅 스크립트를 작성해주세요.

요구사항:
{rules}
다음 JSON 형식으로 응답해주세요:
{{
  "articles": [
    {{
      "number": 1,
      "title": "기사 제목",
      "link": "기사 링크",
      "script": "{name} 말투로 작성된 리포팅 스크립트"
    }}
  ]
}}

JSON만 반환하고 다른 설명은 포함하지 마세요."#,
        feed = persona.feed_name,
        name = persona.name,
    )
}
