use std::path::PathBuf;

use examai::{
  config::Config,
  fetch::Fetcher,
  paper::{PaperType, ProcessedPaper, QuestionType},
  scrape::{ScrapeOptions, Scraper},
  source::SourceConfig,
  storage::PaperStorage,
};
use mockito::{Mock, Server, ServerGuard};
use tempfile::{tempdir, TempDir};
use tracing_test::traced_test;

mod workflows;

pub type TestResult<T> = anyhow::Result<T>;

/// Index page listing two years of papers, with a link that is not a paper and one outside the
/// past-papers section.
pub const INDEX: &str = r#"
<html>
  <body>
    <nav><a href="/contact">Contact us</a></nav>
    <section class="resources">
      <a href="/past-papers/2023/paper-1-qp">2023 Paper 1 Question Paper</a>
      <a href="/past-papers/2023/paper-1-ms">2023 Paper 1 Mark Scheme</a>
      <a href="/past-papers/2023/paper-2-qp">2023 Paper 2 Question Paper</a>
      <a href="/past-papers/2022/paper-1-qp">2022 Paper 1 Question Paper</a>
      <a href="/past-papers/2022/examiner-report">2022 Paper 1 Examiner Report</a>
      <a href="/news/2022-paper-3">2022 Paper 3 Question Paper</a>
    </section>
  </body>
</html>
"#;

pub const QUESTION_PAPER: &str = r#"
<html>
  <body>
    <div class="question-content">Describe the procedure of Asch's study of conformity. [4 marks]</div>
    <div class="question-content">Explain one limitation of the multi-store model. [2 marks]</div>
    <div class="question-content">Discuss the role of the amygdala in aggression. [16 marks]</div>
  </body>
</html>
"#;

pub const MARK_SCHEME: &str = r#"
<html>
  <body>
    <div class="question-content">Evaluate the answer using the levels of response. 16 marks</div>
  </body>
</html>
"#;

/// A scraper pointed at `server`, with no pacing or backoff.
pub fn create_test_scraper(server: &ServerGuard) -> Scraper {
  let source = SourceConfig::default().with_base_url(format!("{}/psychology", server.url()));
  let fetcher = Fetcher::unthrottled(Config::default().scraper.headers, 2).unwrap();
  Scraper::new(fetcher, source.build().unwrap())
}

/// Storage in a fresh temporary directory.
pub async fn create_test_storage() -> (PaperStorage, TempDir) {
  let dir = tempdir().unwrap();
  let storage =
    PaperStorage::open(dir.path().join("examai.db"), dir.path().join("papers.json")).await.unwrap();
  (storage, dir)
}

pub async fn serve(server: &mut ServerGuard, path: &str, body: &str) -> Mock {
  server.mock("GET", path).with_status(200).with_body(body).create_async().await
}

pub fn fixture(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join(".config").join(name)
}
