//! Product catalog: details and content for retrieved product ids.

pub mod error;
pub mod model;


pub use error::{CatalogError, CatalogResult};
pub use model::{Product, ProductCandidate, ProductCategory, ProductPrice, ProductReview};

use async_trait::async_trait;
use futures_util::future::try_join_all;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use crate::embedding::{Embedder, EmbeddingError, EmbeddingResult};
use crate::vectordb::ProductPoint;

/// Source of product details.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetches every known product among `ids`, in request order.
    ///
    /// Unknown ids are skipped, not errors.
    async fn fetch(&self, ids: &[String]) -> CatalogResult<Vec<Product>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Catalog held fully in memory, loaded from JSON or built in.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    products: HashMap<String, Product>,
    order: Vec<String>,
}

impl MemoryCatalog {
    pub fn new(products: Vec<Product>) -> CatalogResult<Self> {
        let mut by_id = HashMap::with_capacity(products.len());
        let mut order = Vec::with_capacity(products.len());
        for product in products {
            if by_id.contains_key(&product.id) {
                return Err(CatalogError::DuplicateProduct { id: product.id });
            }
            order.push(product.id.clone());
            by_id.insert(product.id.clone(), product);
        }
        Ok(Self {
            products: by_id,
            order,
        })
    }

    /// Reads a JSON array of products from `path`.
    pub fn from_path(path: &Path) -> CatalogResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let products: Vec<Product> =
            serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        info!(path = %path.display(), products = products.len(), "loaded product catalog");
        Self::new(products)
    }

    /// Small sample catalog covering the house brands.
    pub fn builtin() -> Self {
        let products = vec![
            Product::new("LG-WATERBANK-01", "Laneige", "워터뱅크 블루 히알루로닉 크림 50ml")
                .category("스킨케어", "기초케어", Some("크림"))
                .price(38000, 30400, 20)
                .review(4.8, 3120, ["촉촉한", "수분가득", "산뜻한"])
                .keywords(["보습", "수분", "비건"])
                .content("블루 히알루로닉산이 피부 깊은 곳까지 수분을 채워 하루 종일 촉촉한 피부로 가꿔주는 수분 크림. 산뜻한 젤 제형으로 끈적임 없이 흡수됩니다."),
            Product::new("LG-CREAMSKIN-02", "Laneige", "크림스킨 토너 앤 모이스처라이저 170ml")
                .category("스킨케어", "기초케어", Some("토너"))
                .price(33000, 29700, 10)
                .review(4.7, 2210, ["보습력좋은", "순한", "건조완화"])
                .keywords(["보습", "장벽", "건조"])
                .content("토너와 크림을 하나로 담아 건조한 피부에 보습 장벽을 채워주는 크림스킨. 민감한 피부도 부담 없이 사용할 수 있는 순한 포뮬러."),
            Product::new("LG-SUN-03", "Laneige", "워터뱅크 UV 쉴드 선크림 SPF50+")
                .category("스킨케어", "선케어", Some("선크림"))
                .price(32000, 22400, 30)
                .review(4.6, 1540, ["백탁없는", "산뜻한", "쿨링감"])
                .keywords(["선크림", "자외선", "쿨링"])
                .content("자외선 차단과 수분 공급을 동시에. 쿨링감 있는 산뜻한 텍스처로 여름철 피지와 번들거림 걱정을 덜어주는 데일리 선크림."),
            Product::new("SW-ESSENCE-01", "Sulwhasoo", "윤조에센스 90ml")
                .category("스킨케어", "기초케어", Some("에센스"))
                .price(150000, 135000, 10)
                .review(4.9, 4820, ["탄력있는", "윤기나는", "영양가득"])
                .keywords(["탄력", "영양", "안티에이징"])
                .content("한방 원료의 조화로 피부 본연의 균형을 되찾아주는 퍼스트 케어 에센스. 탄력과 윤기, 영양을 한 번에 채워 건강한 피부 결을 가꿉니다.")
                .legal_notes("기능성 화장품 심사 완료 (주름 개선)"),
            Product::new("HR-CUSHION-01", "Hera", "블랙 쿠션 SPF34 PA++")
                .category("메이크업", "페이스메이크업", Some("쿠션"))
                .price(62000, 52700, 15)
                .review(4.9, 5680, ["커버력좋은", "지속력좋은", "자연스러운"])
                .keywords(["커버", "지속력", "피지"])
                .content("얇고 가볍게 밀착되어 오랜 시간 무너짐 없이 유지되는 커버 쿠션. 피지 컨트롤 파우더가 번들거림을 잡아 보송한 피부 표현을 완성합니다."),
            Product::new("INN-GREENTEA-01", "Innisfree", "그린티 씨드 히알루론산 세럼 80ml")
                .category("스킨케어", "기초케어", Some("세럼"))
                .price(32000, 16000, 50)
                .review(4.7, 8930, ["수분가득", "순한", "가성비"])
                .keywords(["수분", "진정", "비건"])
                .content("제주 그린티에서 얻은 수분 에너지로 피부 속 수분 길을 열어주는 비건 세럼. 미세먼지에 지친 피부를 진정시켜 줍니다."),
            Product::new("ET-SOONJUNG-01", "Etude", "순정 2x 배리어 인텐시브 크림 60ml")
                .category("스킨케어", "기초케어", Some("크림"))
                .price(25000, 17500, 30)
                .review(4.6, 3300, ["순한", "진정", "장벽강화"])
                .keywords(["진정", "장벽", "민감"])
                .content("민감한 피부를 위한 저자극 장벽 크림. 판테놀이 붉어진 피부를 편안하게 진정시키고 보습막을 형성합니다."),
            Product::new("AS-ATOBARRIER-01", "Aestura", "아토베리어365 크림 80ml")
                .category("스킨케어", "기초케어", Some("크림"))
                .price(31000, 27900, 10)
                .review(4.8, 6120, ["고보습", "순한", "건조완화"])
                .keywords(["고보습", "장벽", "건조"])
                .content("세라마이드 캡슐이 건조한 피부에 365일 보습 장벽을 채워주는 고보습 크림. 겨울철 당김 없이 편안한 피부를 유지합니다.")
                .legal_notes("피부과 테스트 완료"),
        ];

        let mut order = Vec::with_capacity(products.len());
        let mut by_id = HashMap::with_capacity(products.len());
        for product in products {
            order.push(product.id.clone());
            by_id.insert(product.id.clone(), product);
        }
        Self {
            products: by_id,
            order,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.get(id)
    }

    /// Products in insertion order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.order.iter().filter_map(|id| self.products.get(id))
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn fetch(&self, ids: &[String]) -> CatalogResult<Vec<Product>> {
        let found: Vec<Product> = ids
            .iter()
            .filter_map(|id| self.products.get(id).cloned())
            .collect();
        debug!(requested = ids.len(), found = found.len(), "catalog fetch");
        Ok(found)
    }

    fn len(&self) -> usize {
        self.products.len()
    }
}

/// Embeds `products` concurrently into index points.
pub async fn product_points<'a, I>(
    products: I,
    embedder: &dyn Embedder,
) -> EmbeddingResult<Vec<ProductPoint>>
where
    I: IntoIterator<Item = &'a Product>,
{
    try_join_all(products.into_iter().map(|product| async move {
        let vector = embedder.embed(&product.embedding_text()).await?;
        Ok::<_, EmbeddingError>(ProductPoint::new(
            product.id.clone(),
            product.brand.clone(),
            vector,
        ))
    }))
    .await
}
