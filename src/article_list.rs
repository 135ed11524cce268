use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use pagekit_core::articles::ALL_CATEGORIES;
use pagekit_core::config::ArticlesConfig;
use pagekit_core::{builtin_articles, filter_and_sort, Article, ArticleQuery};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;
use yew::AppHandle;

use crate::dom;

thread_local! {
    static ARTICLE_LIST_APP: RefCell<Option<AppHandle<ArticleList>>> = RefCell::new(None);
}

pub(crate) fn mount(config: &ArticlesConfig) {
    if let Some(previous) = ARTICLE_LIST_APP.with(|slot| slot.borrow_mut().take()) {
        previous.destroy();
    }
    let Some(document) = dom::document() else {
        return;
    };
    let Some(root) = dom::query(&document, &config.container_selector) else {
        gloo::console::warn!("articles: container missing", config.container_selector.clone());
        return;
    };
    let articles = match builtin_articles() {
        Ok(articles) => articles,
        Err(err) => {
            gloo::console::warn!("articles: catalog unavailable", err.to_string());
            return;
        }
    };
    gloo::console::log!("articles: mounted", articles.len() as u32);
    root.set_inner_html("");
    let props = ArticleListProps {
        articles: Rc::new(articles),
        controls: config.clone(),
    };
    let app = yew::Renderer::<ArticleList>::with_root_and_props(root, props).render();
    ARTICLE_LIST_APP.with(|slot| {
        *slot.borrow_mut() = Some(app);
    });
}

#[derive(Properties)]
pub(crate) struct ArticleListProps {
    pub articles: Rc<Vec<Article>>,
    pub controls: ArticlesConfig,
}

impl PartialEq for ArticleListProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.articles, &other.articles) && self.controls == other.controls
    }
}

#[function_component(ArticleList)]
pub(crate) fn article_list(props: &ArticleListProps) -> Html {
    let query = use_state(|| dom::document().map_or_else(ArticleQuery::default, |document| {
        read_controls(&document, &props.controls)
    }));
    {
        let query = query.clone();
        use_effect_with(props.controls.clone(), move |controls| {
            let mut listeners = Vec::new();
            if let Some(document) = dom::document() {
                let watched = [
                    (&controls.sort_control, "change"),
                    (&controls.category_control, "change"),
                    (&controls.search_control, "input"),
                ];
                for (selector, event) in watched {
                    let Some(control) = dom::query(&document, selector) else {
                        continue;
                    };
                    let query = query.clone();
                    let controls = controls.clone();
                    let document = document.clone();
                    listeners.push(EventListener::new(&control, event, move |_| {
                        query.set(read_controls(&document, &controls));
                    }));
                }
            }
            move || drop(listeners)
        });
    }

    let visible = filter_and_sort(&props.articles, &query);
    if visible.is_empty() {
        return html! { <p class="error">{ "No blogs found." }</p> };
    }
    html! {
        <>
            { for visible.into_iter().map(article_card) }
        </>
    }
}

fn article_card(article: &Article) -> Html {
    html! {
        <div class="blog-item" key={article.id}>
            <img class="blog-image" src={article.image.clone()} alt={article.title.clone()} />
            <div class="blog-content">
                <h3 class="blog-title">{ article.title.clone() }</h3>
                <div class="blog-card-meta">
                    <p>{ article.byline() }</p>
                    <p>{ article.category_line() }</p>
                </div>
                if !article.tags.is_empty() {
                    <div class="blog-tags">
                        { for article.tags.iter().map(|tag| html! {
                            <span class="blog-tag">{ tag.clone() }</span>
                        }) }
                    </div>
                }
                <p class="blog-content-text">{ article.excerpt() }</p>
            </div>
        </div>
    }
}

/// Missing controls read as their neutral value: no sort, every category,
/// empty search.
fn read_controls(document: &Document, controls: &ArticlesConfig) -> ArticleQuery {
    let sort = select_value(document, &controls.sort_control).unwrap_or_default();
    let category = select_value(document, &controls.category_control)
        .unwrap_or_else(|| ALL_CATEGORIES.to_string());
    let search = dom::query(document, &controls.search_control)
        .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default();
    ArticleQuery::from_controls(&sort, &category, &search)
}

fn select_value(document: &Document, selector: &str) -> Option<String> {
    dom::query(document, selector)
        .and_then(|element| element.dyn_into::<HtmlSelectElement>().ok())
        .map(|select| select.value())
}
