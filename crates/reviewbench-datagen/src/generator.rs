use chrono::{Duration, NaiveDateTime, SubsecRound, Utc};
use rand::prelude::*;

use reviewbench_core::types::{Category, Review, MAX_RATING, MIN_RATING};

use crate::lexicon;

/// Longest filler appended after the templated opening.
pub const FILLER_MAX_CHARS: usize = 200;
/// Reviews are dated within this many days before generation time.
pub const DATE_SPAN_DAYS: i64 = 730;
pub const MAX_HELPFUL: u32 = 100;

/// Which template family a rating draws its opening line from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Favorable,
    Neutral,
    Unfavorable,
}

impl Tier {
    pub fn for_rating(rating: u8) -> Self {
        match rating {
            r if r >= 4 => Tier::Favorable,
            3 => Tier::Neutral,
            _ => Tier::Unfavorable,
        }
    }

    pub fn template_count(self) -> usize {
        match self {
            Tier::Favorable => 4,
            Tier::Neutral | Tier::Unfavorable => 3,
        }
    }

    /// Opening `index` of this tier for `product` (already lower-cased).
    pub fn render(self, index: usize, product: &str, sentence: &str) -> String {
        match (self, index) {
            (Tier::Favorable, 0) => format!("Excelente {product}, superó mis expectativas. {sentence}"),
            (Tier::Favorable, 1) => format!("Muy contento con la compra de este {product}. {sentence}"),
            (Tier::Favorable, 2) => format!("Producto de alta calidad. El {product} es perfecto. {sentence}"),
            (Tier::Favorable, _) => format!("Recomendado 100%. {sentence} El {product} es increíble."),
            (Tier::Neutral, 0) => format!("El {product} cumple con lo esperado. {sentence}"),
            (Tier::Neutral, 1) => format!("Producto correcto, nada extraordinario. {sentence}"),
            (Tier::Neutral, _) => format!("Está bien por el precio. {sentence}"),
            (Tier::Unfavorable, 0) => format!("Decepcionado con el {product}. {sentence}"),
            (Tier::Unfavorable, 1) => format!("No lo recomiendo. {sentence} El {product} no es bueno."),
            (Tier::Unfavorable, _) => format!("Mala calidad. {sentence}"),
        }
    }
}

/// Dates are kept at microsecond precision, the finest a PostgreSQL
/// `TIMESTAMP` stores.
fn now_micros() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(6)
}

/// Seedable source of synthetic reviews.
pub struct ReviewGenerator {
    rng: StdRng,
    now: NaiveDateTime,
}

impl ReviewGenerator {
    pub fn with_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), now: now_micros() }
    }

    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy(), now: now_micros() }
    }

    /// Pin the upper bound of generated dates, making seeded output fully
    /// reproducible.
    pub fn at(mut self, now: NaiveDateTime) -> Self {
        self.now = now.trunc_subsecs(6);
        self
    }

    pub fn generate_review(&mut self) -> Review {
        let category = *Category::ALL.choose(&mut self.rng).unwrap_or(&Category::Electronics);
        let product = category.products().choose(&mut self.rng).copied().unwrap_or("Producto");
        let rating = self.rng.gen_range(MIN_RATING..=MAX_RATING);

        let tier = Tier::for_rating(rating);
        let template = self.rng.gen_range(0..tier.template_count());
        let opening = tier.render(template, &product.to_lowercase(), &lexicon::sentence(&mut self.rng));
        let filler = lexicon::text(&mut self.rng, FILLER_MAX_CHARS);

        let id = uuid::Builder::from_random_bytes(self.rng.gen()).into_uuid();
        let offset = Duration::seconds(self.rng.gen_range(0..=DATE_SPAN_DAYS * 86_400))
            + Duration::microseconds(self.rng.gen_range(0..1_000_000));

        Review {
            id: id.to_string(),
            product_name: product.to_string(),
            category,
            rating,
            review_text: format!("{opening} {filler}"),
            reviewer_name: lexicon::name(&mut self.rng),
            reviewer_email: lexicon::email(&mut self.rng),
            date: self.now - offset,
            verified_purchase: self.rng.gen_bool(0.5),
            helpful_count: self.rng.gen_range(0..=MAX_HELPFUL),
        }
    }

    pub fn generate(&mut self, count: usize) -> Vec<Review> {
        (0..count).map(|_| self.generate_review()).collect()
    }
}
