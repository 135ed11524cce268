use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Deserialize;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;

use crate::error::CatalogError;

const BUILTIN_ARTICLES: &str = include_str!("../data/articles.json");
const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const LONG_DATE: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");
pub const EXCERPT_CHARS: usize = 100;
pub const ALL_CATEGORIES: &str = "all";

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Article {
    pub id: u32,
    pub title: String,
    pub image: String,
    pub category: String,
    pub author: String,
    #[serde(rename = "authorPic", default)]
    pub author_pic: String,
    pub published_date: String,
    pub reading_time: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Article {
    /// Accepts `2023-10-01` and `October 4, 2023`.
    pub fn published_on(&self) -> Option<Date> {
        let raw = self.published_date.trim();
        Date::parse(raw, ISO_DATE)
            .or_else(|_| Date::parse(raw, LONG_DATE))
            .ok()
    }

    /// Leading integer of values like `8 minutes`.
    pub fn reading_minutes(&self) -> Option<u32> {
        let raw = self.reading_time.trim_start();
        let digits: String = raw.chars().take_while(|ch| ch.is_ascii_digit()).collect();
        digits.parse().ok()
    }

    pub fn byline(&self) -> String {
        format!(
            "By {} | {} | {}",
            self.author, self.published_date, self.reading_time
        )
    }

    pub fn category_line(&self) -> String {
        format!("Category: {}", self.category)
    }

    pub fn excerpt(&self) -> String {
        excerpt(&self.content)
    }
}

pub fn excerpt(content: &str) -> String {
    let mut out: String = content.chars().take(EXCERPT_CHARS).collect();
    out.push_str("...");
    out
}

pub fn builtin_articles() -> Result<Vec<Article>, CatalogError> {
    parse_articles(BUILTIN_ARTICLES)
}

pub fn parse_articles(json: &str) -> Result<Vec<Article>, CatalogError> {
    let articles: Vec<Article> = serde_json::from_str(json)?;
    let mut seen = HashSet::new();
    for article in &articles {
        if !seen.insert(article.id) {
            return Err(CatalogError::DuplicateId(article.id));
        }
    }
    Ok(articles)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Catalog order.
    #[default]
    None,
    /// Newest first.
    Date,
    /// Longest first.
    ReadingTime,
    /// Alphabetical.
    Category,
}

impl SortKey {
    pub fn from_control(value: &str) -> Self {
        match value {
            "date" => SortKey::Date,
            "readingTime" => SortKey::ReadingTime,
            "category" => SortKey::Category,
            _ => SortKey::None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArticleQuery {
    /// Lowercased; `None` shows every category.
    pub category: Option<String>,
    /// Lowercased title substring; empty matches everything.
    pub search: String,
    pub sort: SortKey,
}

impl ArticleQuery {
    pub fn from_controls(sort: &str, category: &str, search: &str) -> Self {
        let category = category.to_lowercase();
        let category = if category == ALL_CATEGORIES {
            None
        } else {
            Some(category)
        };
        Self {
            category,
            search: search.to_lowercase(),
            sort: SortKey::from_control(sort),
        }
    }

    pub fn matches(&self, article: &Article) -> bool {
        if let Some(category) = self.category.as_deref() {
            if article.category.to_lowercase() != category {
                return false;
            }
        }
        self.search.is_empty() || article.title.to_lowercase().contains(&self.search)
    }
}

/// Filters then stably sorts; ties keep catalog order.
pub fn filter_and_sort<'a>(articles: &'a [Article], query: &ArticleQuery) -> Vec<&'a Article> {
    let mut out: Vec<&Article> = articles
        .iter()
        .filter(|article| query.matches(article))
        .collect();
    match query.sort {
        SortKey::None => {}
        SortKey::Date => {
            out.sort_by(|a, b| descending_known_first(a.published_on(), b.published_on()))
        }
        SortKey::ReadingTime => {
            out.sort_by(|a, b| descending_known_first(a.reading_minutes(), b.reading_minutes()))
        }
        SortKey::Category => out.sort_by(|a, b| {
            a.category
                .to_lowercase()
                .cmp(&b.category.to_lowercase())
                .then_with(|| a.category.cmp(&b.category))
        }),
    }
    out
}

fn descending_known_first<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
