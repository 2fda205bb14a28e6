use super::*;

#[test]
fn test_load_custom_source_config() -> TestResult<()> {
  let config = Config::load(fixture("custom_source.toml"))?;

  assert_eq!(config.database_path, PathBuf::from("papers.db"));
  assert_eq!(config.scraper.rate_limit.requests_per_minute, 120);
  assert_eq!(config.scraper.rate_limit.burst, 2);
  assert_eq!(config.scraper.retry.attempts, 1);
  // headers were not given, so the defaults apply
  assert_eq!(config.scraper.headers, Config::default().scraper.headers);
  assert_eq!(config.source.base_url(), "https://papers.example.org/psychology/");
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_scrape_with_custom_source() -> TestResult<()> {
  let mut server = Server::new_async().await;
  let _index = serve(
    &mut server,
    "/psychology/",
    r#"<ul>
      <li class="paper"><a href="2021/p1">2021 - Paper 1 - Question Paper</a></li>
      <li class="paper"><a href="2021/p1-ms">2021 - Paper 1 - Mark Scheme</a></li>
      <li class="other"><a href="2021/p2">2021 - Paper 2 - Question Paper</a></li>
    </ul>"#,
  )
  .await;
  let _qp = serve(
    &mut server,
    "/psychology/2021/p1",
    "<ol class=\"questions\"><li>Outline the cognitive interview. [6 marks]</li><li>Explain why. [2 marks]</li></ol>",
  )
  .await;
  let _ms = serve(&mut server, "/psychology/2021/p1-ms", "<p>No questions listed.</p>").await;

  let config = Config::load(fixture("custom_source.toml"))?;
  let source = config.source.with_base_url(format!("{}/psychology/", server.url()));
  let fetcher = Fetcher::unthrottled(config.scraper.headers.clone(), 1)?;
  let mut scraper = Scraper::new(fetcher, source.build()?);

  let papers = scraper.scrape_past_papers(&ScrapeOptions::new()).await?;
  assert_eq!(papers.len(), 2);
  assert_eq!(papers[0].url(), format!("{}/psychology/2021/p1", server.url()));
  assert_eq!(papers[0].total_marks(), 8);
  assert_eq!(papers[0].questions().unwrap()[0].kind, QuestionType::Other);
  assert_eq!(papers[1].link.kind, PaperType::MarkScheme);
  assert_eq!(papers[1].questions(), Some(&[][..]));
  Ok(())
}
