use std::fmt;

/// The eight parts of speech covered by the first-year middle school
/// curriculum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Noun,
    Pronoun,
    Verb,
    Adjective,
    Adverb,
    Preposition,
    Conjunction,
    Interjection,
}

impl PartOfSpeech {
    pub fn as_str(self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "Noun",
            PartOfSpeech::Pronoun => "Pronoun",
            PartOfSpeech::Verb => "Verb",
            PartOfSpeech::Adjective => "Adjective",
            PartOfSpeech::Adverb => "Adverb",
            PartOfSpeech::Preposition => "Preposition",
            PartOfSpeech::Conjunction => "Conjunction",
            PartOfSpeech::Interjection => "Interjection",
        }
    }

    pub fn entry(self) -> &'static Category {
        &CATEGORIES[CATEGORIES
            .iter()
            .position(|c| c.id == self)
            .expect("every part of speech has a catalog entry")]
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalog card: static per-category display data.
pub struct Category {
    pub id: PartOfSpeech,
    pub korean_name: &'static str,
    /// Card accent color as (r, g, b).
    pub color: (u8, u8, u8),
    pub icon: &'static str,
    pub description: &'static str,
    pub example: &'static str,
}

pub const CATEGORIES: [Category; 8] = [
    Category {
        id: PartOfSpeech::Noun,
        korean_name: "명사",
        color: (59, 130, 246),
        icon: "📦",
        description: "사람, 사물, 장소, 이름 등을 나타내는 말",
        example: "Apple, Book, Seoul, Joy",
    },
    Category {
        id: PartOfSpeech::Pronoun,
        korean_name: "대명사",
        color: (99, 102, 241),
        icon: "👆",
        description: "명사를 대신해서 쓰는 말",
        example: "I, You, It, They",
    },
    Category {
        id: PartOfSpeech::Verb,
        korean_name: "동사",
        color: (239, 68, 68),
        icon: "🏃",
        description: "동작이나 상태를 나타내는 말 (~다)",
        example: "Run, Eat, Is, Have",
    },
    Category {
        id: PartOfSpeech::Adjective,
        korean_name: "형용사",
        color: (236, 72, 153),
        icon: "✨",
        description: "명사나 대명사를 꾸며주는 말 (~ㄴ, ~의)",
        example: "Happy, Big, Red, Good",
    },
    Category {
        id: PartOfSpeech::Adverb,
        korean_name: "부사",
        color: (249, 115, 22),
        icon: "🚀",
        description: "동사, 형용사, 다른 부사를 꾸며주는 말",
        example: "Very, Quickly, Well, Always",
    },
    Category {
        id: PartOfSpeech::Preposition,
        korean_name: "전치사",
        color: (34, 197, 94),
        icon: "📍",
        description: "명사 앞에 놓여 시간, 장소, 방향 등을 나타내는 말",
        example: "In, On, At, For",
    },
    Category {
        id: PartOfSpeech::Conjunction,
        korean_name: "접속사",
        color: (234, 179, 8),
        icon: "🔗",
        description: "단어와 단어, 문장과 문장을 이어주는 말",
        example: "And, But, Because, So",
    },
    Category {
        id: PartOfSpeech::Interjection,
        korean_name: "감탄사",
        color: (168, 85, 247),
        icon: "❗",
        description: "놀람, 느낌, 부름 등을 나타내는 말",
        example: "Wow, Oh, Ouch, Hey",
    },
];
