//! Personas, brand guidelines and brand resolution.

pub mod error;
pub mod scorer;


pub use error::{PersonaError, PersonaResult};
pub use scorer::{BrandResolution, BrandScorer, BrandSource};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// A target customer segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Brands this segment is known to favor.
    #[serde(default)]
    pub recommended_brands: Vec<String>,
}

/// Voice and writing rules for one brand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandGuideline {
    pub brand: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub focus: String,
    #[serde(default)]
    pub rules: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    personas: Vec<Persona>,
    #[serde(default)]
    brands: Vec<BrandGuideline>,
}

/// Lookup tables for personas and brand guidelines.
#[derive(Debug, Clone, Default)]
pub struct PersonaCatalog {
    personas: HashMap<String, Persona>,
    guidelines: HashMap<String, BrandGuideline>,
}

impl PersonaCatalog {
    pub fn new(personas: Vec<Persona>, guidelines: Vec<BrandGuideline>) -> PersonaResult<Self> {
        let mut by_id = HashMap::with_capacity(personas.len());
        for persona in personas {
            if by_id.contains_key(&persona.id) {
                return Err(PersonaError::DuplicatePersona { id: persona.id });
            }
            by_id.insert(persona.id.clone(), persona);
        }

        let guidelines = guidelines
            .into_iter()
            .map(|g| (g.brand.to_lowercase(), g))
            .collect();

        Ok(Self {
            personas: by_id,
            guidelines,
        })
    }

    /// Reads `{"personas": [...], "brands": [...]}` from `path`.
    pub fn from_path(path: &Path) -> PersonaResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| PersonaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: CatalogFile =
            serde_json::from_str(&raw).map_err(|source| PersonaError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::new(file.personas, file.brands)
    }

    /// Built-in segments and guidelines for the house brands.
    pub fn builtin() -> Self {
        fn persona(
            id: &str,
            name: &str,
            description: &str,
            tone: &str,
            keywords: &[&str],
            brands: &[&str],
        ) -> Persona {
            Persona {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                tone: tone.to_string(),
                keywords: keywords.iter().map(|s| s.to_string()).collect(),
                recommended_brands: brands.iter().map(|s| s.to_string()).collect(),
            }
        }

        fn guideline(
            brand: &str,
            group: &str,
            tone: &str,
            focus: &str,
            rules: &[&str],
        ) -> BrandGuideline {
            BrandGuideline {
                brand: brand.to_string(),
                group: group.to_string(),
                tone: tone.to_string(),
                focus: focus.to_string(),
                rules: rules.iter().map(|s| s.to_string()).collect(),
            }
        }

        let personas = vec![
            persona(
                "1",
                "프리미엄 안티에이징 추구자",
                "40대 이상 고소득층, 고급 안티에이징 제품 선호",
                "품격 있는",
                &["안티에이징", "프리미엄", "탄력"],
                &["Sulwhasoo", "Hera"],
            ),
            persona(
                "2",
                "실속형 데일리 케어",
                "가성비와 꾸준한 관리를 중시하는 20-30대",
                "친근한",
                &["수분", "보습", "할인"],
                &["Laneige", "Innisfree", "Etude"],
            ),
            persona(
                "3",
                "클린 뷰티 지향",
                "성분과 저자극을 꼼꼼히 따지는 민감성 피부 고객",
                "차분한",
                &["비건", "저자극", "진정"],
                &["Innisfree", "Aestura"],
            ),
            persona(
                "4",
                "Trend Setter",
                "트렌드 민감",
                "트렌디",
                &["신제품", "컬러", "한정판"],
                &["Hera", "Laneige", "Etude"],
            ),
        ];

        let guidelines = vec![
            guideline(
                "Sulwhasoo",
                "luxury",
                "격조 있고 절제된 어조",
                "한방 헤리티지와 안티에이징 가치",
                &["과장 없이 품격을 유지한다", "감탄사와 이모지를 최소화한다"],
            ),
            guideline(
                "Hera",
                "premium",
                "세련되고 도시적인 어조",
                "트렌디한 메이크업과 스타일",
                &["간결한 문장을 사용한다", "스타일 제안을 포함한다"],
            ),
            guideline(
                "Laneige",
                "daily",
                "밝고 산뜻한 어조",
                "수분 과학과 데일리 루틴",
                &["친근하게 말을 건넨다", "루틴 속 사용 장면을 보여준다"],
            ),
            guideline(
                "Innisfree",
                "daily",
                "자연 친화적이고 편안한 어조",
                "자연 유래 성분과 지속 가능성",
                &["성분 이야기를 쉽게 풀어낸다"],
            ),
            guideline(
                "Etude",
                "daily",
                "발랄하고 위트 있는 어조",
                "컬러와 재미",
                &["짧고 리듬감 있게 쓴다"],
            ),
            guideline(
                "Aestura",
                "derma",
                "신뢰감 있고 차분한 어조",
                "민감 피부 장벽 케어",
                &["효능을 단정하지 않는다", "사용감 중심으로 설명한다"],
            ),
        ];

        Self {
            personas: personas.into_iter().map(|p| (p.id.clone(), p)).collect(),
            guidelines: guidelines
                .into_iter()
                .map(|g| (g.brand.to_lowercase(), g))
                .collect(),
        }
    }

    pub fn persona(&self, id: &str) -> Option<&Persona> {
        self.personas.get(id)
    }

    /// Guideline lookup is case-insensitive on brand name.
    pub fn guideline(&self, brand: &str) -> Option<&BrandGuideline> {
        self.guidelines.get(&brand.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}
