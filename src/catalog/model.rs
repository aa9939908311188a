use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductCategory {
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub middle: Option<String>,
    #[serde(default, alias = "small")]
    pub minor: Option<String>,
}

impl ProductCategory {
    /// `major > middle > minor`, skipping missing levels.
    pub fn path(&self) -> String {
        [&self.major, &self.middle, &self.minor]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" > ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPrice {
    #[serde(default, alias = "original_price")]
    pub original: u64,
    #[serde(default, rename = "final", alias = "discounted_price")]
    pub final_price: u64,
    /// Integer percent, `0..=100`.
    #[serde(default)]
    pub discount_rate: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductReview {
    /// `0.0..=5.0`.
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub top_keywords: Vec<String>,
}

/// A catalog product as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(alias = "product_id")]
    pub id: String,
    pub brand: String,
    pub name: String,
    #[serde(default)]
    pub category: ProductCategory,
    #[serde(default)]
    pub price: ProductPrice,
    #[serde(default)]
    pub review: ProductReview,
    /// Detail text the re-ranker reads. Empty content excludes the product from ranking.
    #[serde(default, alias = "description")]
    pub content: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Legal notes handed to the compliance judge.
    #[serde(default)]
    pub legal_notes: Option<String>,
}

impl Product {
    pub fn new(id: impl Into<String>, brand: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            brand: brand.into(),
            name: name.into(),
            category: ProductCategory::default(),
            price: ProductPrice::default(),
            review: ProductReview::default(),
            content: String::new(),
            keywords: Vec::new(),
            legal_notes: None,
        }
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn category(mut self, major: &str, middle: &str, minor: Option<&str>) -> Self {
        self.category = ProductCategory {
            major: Some(major.to_string()),
            middle: Some(middle.to_string()),
            minor: minor.map(str::to_string),
        };
        self
    }

    /// Sets the price; the discount rate is clamped to 100.
    pub fn price(mut self, original: u64, final_price: u64, discount_rate: u8) -> Self {
        self.price = ProductPrice {
            original,
            final_price,
            discount_rate: discount_rate.min(100),
        };
        self
    }

    pub fn review<I, S>(mut self, score: f32, count: u32, top_keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.review = ProductReview {
            score: score.clamp(0.0, 5.0),
            count,
            top_keywords: top_keywords.into_iter().map(Into::into).collect(),
        };
        self
    }

    pub fn legal_notes(mut self, notes: impl Into<String>) -> Self {
        self.legal_notes = Some(notes.into());
        self
    }

    /// Text embedded into the product index.
    pub fn embedding_text(&self) -> String {
        let mut lines = vec![format!("{} {}", self.brand, self.name)];
        let category = self.category.path();
        if !category.is_empty() {
            lines.push(category);
        }
        if !self.keywords.is_empty() {
            lines.push(self.keywords.join(" "));
        }
        if !self.content.is_empty() {
            lines.push(self.content.clone());
        }
        lines.join("\n")
    }
}

/// A product that came back from coarse retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCandidate {
    #[serde(flatten)]
    pub product: Product,
    /// Coarse retrieval similarity.
    pub similarity: f32,
}

impl ProductCandidate {
    pub fn new(product: Product, similarity: f32) -> Self {
        Self {
            product,
            similarity,
        }
    }

    pub fn id(&self) -> &str {
        &self.product.id
    }

    pub fn name(&self) -> &str {
        &self.product.name
    }

    pub fn brand(&self) -> &str {
        &self.product.brand
    }

    pub fn discount_rate(&self) -> u8 {
        self.product.price.discount_rate
    }
}
