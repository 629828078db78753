use anyhow::{Context, Result, bail};
use clap::Parser;
use seoblog::{
    app_state::build_pipeline,
    config::Config,
    generator::{BlogGenerator, GeminiBackend},
    keywords::SharedKeywordModel,
    prompt::{BlogConfig, Tone},
};
use std::sync::Arc;

/// Turn a web page into an SEO blog post and print it as markdown.
#[derive(Parser, Debug)]
#[command(name = "generate", version)]
struct Args {
    /// Page to write about.
    url: String,

    /// Target length in words.
    #[arg(long)]
    length: Option<u32>,

    /// professional, casual, technical, persuasive or educational.
    #[arg(long, default_value = "professional")]
    tone: String,

    /// Leave out the closing call-to-action.
    #[arg(long)]
    no_cta: bool,

    /// Only extract and analyse the page; print the preview as JSON.
    #[arg(long)]
    preview: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;

    let backend = GeminiBackend::new(
        config.gemini_api_key(),
        config.gemini_model(),
        config.gemini_base_url(),
        config.generation_timeout(),
    )?;
    let pipeline = build_pipeline(
        &config,
        BlogGenerator::new(Arc::new(backend)),
        Arc::new(SharedKeywordModel::lexical()),
    );

    if args.preview {
        let preview = pipeline.preview(&args.url).await?;
        println!("{}", serde_json::to_string_pretty(&preview)?);
        return Ok(());
    }

    if config.gemini_api_key().is_empty() {
        bail!("GEMINI_API_KEY must be set to generate a blog");
    }

    let blog_config = BlogConfig {
        length: args.length.unwrap_or(config.length_limits().default),
        tone: args.tone.parse::<Tone>()?,
        include_cta: !args.no_cta,
    };
    let generated = pipeline
        .generate(&args.url, blog_config)
        .await
        .with_context(|| format!("could not generate a blog from {}", args.url))?;

    println!("{}", generated.blog.content);
    Ok(())
}
