//! Delivery channels and their length/structure budgets.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    #[default]
    AppPush,
    Sms,
    Email,
    Kakao,
}

/// Budgets and layout a drafted message must respect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelConstraints {
    pub channel: Channel,
    /// Title budget in tokens.
    pub title_limit: u32,
    /// Body budget in tokens.
    pub body_limit: u32,
    pub structure: &'static str,
    pub guidelines: &'static [&'static str],
}

impl Channel {
    /// Parses a channel label. Unknown labels map to [`Channel::AppPush`].
    pub fn from_label(label: &str) -> Self {
        let key: String = label
            .trim()
            .to_uppercase()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect();
        match key.as_str() {
            "SMS" | "LMS" => Channel::Sms,
            "EMAIL" | "MAIL" => Channel::Email,
            "KAKAO" | "KAKAOTALK" | "ALIMTALK" => Channel::Kakao,
            _ => Channel::AppPush,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::AppPush => "APP_PUSH",
            Channel::Sms => "SMS",
            Channel::Email => "EMAIL",
            Channel::Kakao => "KAKAO",
        }
    }

    pub fn constraints(&self) -> ChannelConstraints {
        match self {
            Channel::AppPush => ChannelConstraints {
                channel: *self,
                title_limit: 50,
                body_limit: 100,
                structure: "① 제목 (후킹 요소)\n② 본문 (혜택 + 이모지)",
                guidelines: &[
                    "이모지를 사용하여 주목도를 높이세요.",
                    "즉각적인 혜택에 집중하세요.",
                    "매우 짧고 임팩트 있게 작성하세요.",
                ],
            },
            Channel::Sms => ChannelConstraints {
                channel: *self,
                title_limit: 100,
                body_limit: 600,
                structure: "① 제목 (명확한 주제)\n② 본문 (핵심 메시지)\n③ CTA (링크)",
                guidelines: &[
                    "특별한 서식 사용 금지 (텍스트만 사용).",
                    "핵심 내용을 바로 전달하세요.",
                    "명확한 행동 유도(CTA) 링크를 포함하세요.",
                ],
            },
            Channel::Email => ChannelConstraints {
                channel: *self,
                title_limit: 50,
                body_limit: 600,
                structure: "① 공감/상황 제시 (1~2문장)\n② 개인화 포인트 (피부/날씨/이력)\n③ 제안 or 혜택\n④ CTA (링크/버튼 유도)",
                guidelines: &[
                    "전문적이면서도 매력적인 톤을 사용하세요.",
                    "섹션을 명확히 구분하세요.",
                    "고객이 얻을 수 있는 '이유'에 집중하세요.",
                ],
            },
            Channel::Kakao => ChannelConstraints {
                channel: *self,
                title_limit: 100,
                body_limit: 600,
                structure: "① 제목 (시선을 끄는 문구)\n② 인사말 (개인화)\n③ 핵심 혜택 (글머리 기호)\n④ CTA",
                guidelines: &[
                    "가독성을 위해 글머리 기호를 사용하세요.",
                    "친근하고 접근하기 쉬운 톤을 사용하세요.",
                    "핵심 혜택을 명확하게 강조하세요.",
                ],
            },
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_variants() {
        assert_eq!(Channel::from_label("APP_PUSH"), Channel::AppPush);
        assert_eq!(Channel::from_label("apppush"), Channel::AppPush);
        assert_eq!(Channel::from_label(" sms "), Channel::Sms);
        assert_eq!(Channel::from_label("e-mail"), Channel::Email);
        assert_eq!(Channel::from_label("Kakao"), Channel::Kakao);
    }

    #[test]
    fn test_unknown_channel_defaults_to_push() {
        assert_eq!(Channel::from_label("fax"), Channel::AppPush);
        assert_eq!(Channel::from_label(""), Channel::AppPush);
    }

    #[test]
    fn test_constraints_budgets() {
        let push = Channel::AppPush.constraints();
        assert_eq!((push.title_limit, push.body_limit), (50, 100));

        let sms = Channel::Sms.constraints();
        assert_eq!((sms.title_limit, sms.body_limit), (100, 600));

        let email = Channel::Email.constraints();
        assert_eq!((email.title_limit, email.body_limit), (50, 600));

        let kakao = Channel::Kakao.constraints();
        assert_eq!((kakao.title_limit, kakao.body_limit), (100, 600));
        assert_eq!(kakao.guidelines.len(), 3);
    }

    #[test]
    fn test_serde_uses_wire_labels() {
        assert_eq!(
            serde_json::to_string(&Channel::AppPush).unwrap(),
            "\"APP_PUSH\""
        );
        let ch: Channel = serde_json::from_str("\"KAKAO\"").unwrap();
        assert_eq!(ch, Channel::Kakao);
    }
}
