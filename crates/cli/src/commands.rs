//! Command-line arguments and their mapping onto store calls.

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use inkwell_client::Store;
use inkwell_core::model::{
    CategoryFilter, EntityStatus, IdFilter, PaginationFilter, PostFilter, SortFilter, SortOrder, StringFilter,
};
use serde_json::{Value, json};

#[derive(Debug, Parser)]
#[command(name = "inkwell", version, about = "Query categories and posts from the content API")]
pub struct Cli {
    /// Override the configured API endpoint.
    #[arg(long, global = true, env = "INKWELL_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that the API is reachable.
    Ping,
    /// List posts.
    Posts(PostArgs),
    /// List categories.
    Categories(CategoryArgs),
    /// Show one post.
    Post { id: String },
    /// Show one category.
    Category { id: String },
}

#[derive(Debug, Clone, Default, Args)]
pub struct PageArgs {
    /// Sort field, e.g. created_at.
    #[arg(long)]
    pub sort_by: Option<String>,
    /// Sort descending.
    #[arg(long)]
    pub desc: bool,
    #[arg(long)]
    pub limit: Option<u32>,
    #[arg(long)]
    pub skip: Option<u32>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct PostArgs {
    /// ACTIVE, PENDING or ARCHIVED.
    #[arg(long)]
    pub status: Option<EntityStatus>,
    /// Restrict to these category ids (repeatable).
    #[arg(long = "category")]
    pub categories: Vec<String>,
    #[arg(long)]
    pub title_regex: Option<String>,
    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Clone, Default, Args)]
pub struct CategoryArgs {
    /// ACTIVE, PENDING or ARCHIVED.
    #[arg(long)]
    pub status: Option<EntityStatus>,
    #[arg(long)]
    pub name_regex: Option<String>,
    #[command(flatten)]
    pub page: PageArgs,
}

impl PageArgs {
    fn apply(&self) -> (Option<SortFilter>, Option<PaginationFilter>) {
        let sort = self.sort_by.as_ref().map(|field| SortFilter {
            sort_by: Some(field.clone()),
            sort_order: Some(if self.desc { SortOrder::Desc } else { SortOrder::Asc }),
        });
        let pagination = (self.limit.is_some() || self.skip.is_some())
            .then(|| PaginationFilter { limit: self.limit, skip: self.skip });
        (sort, pagination)
    }
}

impl PostArgs {
    pub fn filter(&self) -> Option<PostFilter> {
        let (sort, pagination) = self.page.apply();
        let category = match self.categories.as_slice() {
            [] => None,
            [one] => Some(IdFilter::eq(one.clone())),
            many => Some(IdFilter::any_of(many.iter().cloned())),
        };
        let filter = PostFilter {
            title: self.title_regex.clone().map(StringFilter::regex),
            slug: None,
            category,
            status: self.status,
            sort,
            pagination,
        };
        (filter != PostFilter::default()).then_some(filter)
    }
}

impl CategoryArgs {
    pub fn filter(&self) -> Option<CategoryFilter> {
        let (sort, pagination) = self.page.apply();
        let filter = CategoryFilter {
            name: self.name_regex.clone().map(StringFilter::regex),
            slug: None,
            status: self.status,
            sort,
            pagination,
        };
        (filter != CategoryFilter::default()).then_some(filter)
    }
}

/// Execute `command` and return its JSON output.
pub async fn run(store: &Store, command: Command) -> Result<Value> {
    let output = match command {
        Command::Ping => json!({ "ping": store.ping().await? }),
        Command::Posts(args) => serde_json::to_value(store.list_posts(args.filter()).await?)?,
        Command::Categories(args) => serde_json::to_value(store.list_categories(args.filter()).await?)?,
        Command::Post { id } => match store.get_post(&id).await? {
            Some(post) => serde_json::to_value(post)?,
            None => bail!("post {id} not found"),
        },
        Command::Category { id } => match store.get_category(&id).await? {
            Some(category) => serde_json::to_value(category)?,
            None => bail!("category {id} not found"),
        },
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_means_unfiltered() {
        assert!(PostArgs::default().filter().is_none());
        assert!(CategoryArgs::default().filter().is_none());
    }

    #[test]
    fn test_post_flags_to_filter() {
        let cli = Cli::parse_from([
            "inkwell", "posts", "--status", "active", "--category", "c1", "--sort-by", "created_at", "--desc", "--limit",
            "10",
        ]);
        let Command::Posts(args) = cli.command else { panic!("expected posts") };
        let filter = args.filter().unwrap();

        assert_eq!(filter.status, Some(EntityStatus::Active));
        assert_eq!(filter.category, Some(IdFilter::eq("c1")));
        assert_eq!(filter.sort.unwrap().sort_order, Some(SortOrder::Desc));
        assert_eq!(filter.pagination.unwrap().limit, Some(10));
    }

    #[test]
    fn test_repeated_category_becomes_membership() {
        let cli = Cli::parse_from(["inkwell", "posts", "--category", "c2", "--category", "c1"]);
        let Command::Posts(args) = cli.command else { panic!("expected posts") };
        assert_eq!(args.filter().unwrap().category, Some(IdFilter::any_of(["c2", "c1"])));
    }

    #[test]
    fn test_category_regex() {
        let cli = Cli::parse_from(["inkwell", "categories", "--name-regex", "^te"]);
        let Command::Categories(args) = cli.command else { panic!("expected categories") };
        assert_eq!(args.filter().unwrap().name, Some(StringFilter::regex("^te")));
    }

    #[test]
    fn test_invalid_status_rejected() {
        assert!(Cli::try_parse_from(["inkwell", "posts", "--status", "deleted"]).is_err());
    }
}
