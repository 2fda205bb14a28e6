use super::*;

#[traced_test]
#[tokio::test]
async fn test_scrape_year_and_store() -> TestResult<()> {
  let mut server = Server::new_async().await;
  let _index = serve(&mut server, "/psychology", INDEX).await;
  let _p1_qp = serve(&mut server, "/past-papers/2023/paper-1-qp", QUESTION_PAPER).await;
  let _p1_ms = serve(&mut server, "/past-papers/2023/paper-1-ms", MARK_SCHEME).await;
  let _p2_qp = serve(&mut server, "/past-papers/2023/paper-2-qp", QUESTION_PAPER).await;

  let mut scraper = create_test_scraper(&server);
  let (storage, _dir) = create_test_storage().await;

  let papers = scraper.scrape_past_papers(&ScrapeOptions::new().with_year("2023")).await?;
  assert_eq!(papers.len(), 3);
  for paper in &papers {
    storage.store_paper(paper).await?;
  }

  let question_paper = storage
    .get_paper(&format!("{}/past-papers/2023/paper-1-qp", server.url()))
    .await
    .expect("question paper should be stored");
  let questions = question_paper.questions().expect("question paper should have been processed");
  assert_eq!(questions.len(), 3);
  assert_eq!(questions.iter().map(|q| q.kind).collect::<Vec<_>>(), vec![
    QuestionType::Description,
    QuestionType::Explanation,
    QuestionType::Discussion
  ]);
  assert_eq!(question_paper.total_marks(), 22);

  let mark_schemes = storage.get_papers_by_type(PaperType::MarkScheme).await;
  assert_eq!(mark_schemes.len(), 1);
  assert_eq!(mark_schemes[0].questions().unwrap()[0].marks, 16);
  assert_eq!(mark_schemes[0].questions().unwrap()[0].kind, QuestionType::Evaluation);

  assert_eq!(storage.get_papers_by_year("2023").await.len(), 3);
  assert!(storage.get_papers_by_year("2022").await.is_empty());
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_failed_paper_is_stored_as_degraded_record() -> TestResult<()> {
  let mut server = Server::new_async().await;
  let _index = serve(&mut server, "/psychology", INDEX).await;
  let failing = server
    .mock("GET", "/past-papers/2022/paper-1-qp")
    .with_status(500)
    .expect(2)
    .create_async()
    .await;

  let mut scraper = create_test_scraper(&server);
  let (storage, _dir) = create_test_storage().await;

  let options = ScrapeOptions::new().with_year("2022").with_paper("Paper 1");
  let papers = scraper.scrape_past_papers(&options).await?;
  assert_eq!(papers.len(), 1);
  storage.store_paper(&papers[0]).await?;

  let stored = storage.get_paper(papers[0].url()).await.expect("degraded record should be stored");
  assert!(stored.is_failed());
  assert!(stored.error().unwrap().contains("500"));

  let summary = storage.summary().await;
  assert_eq!(summary.total, 1);
  assert_eq!(summary.failed, 1);
  assert_eq!(summary.question_papers, 1);
  failing.assert_async().await;
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_rescrape_replaces_stored_records() -> TestResult<()> {
  let mut server = Server::new_async().await;
  let _index = serve(&mut server, "/psychology", INDEX).await;
  let path = "/past-papers/2022/paper-1-qp";
  let _broken = server.mock("GET", path).with_status(503).expect(2).create_async().await;

  let mut scraper = create_test_scraper(&server);
  let (storage, _dir) = create_test_storage().await;
  let options = ScrapeOptions::new().with_year("2022");

  for paper in scraper.scrape_past_papers(&options).await? {
    storage.store_paper(&paper).await?;
  }
  assert_eq!(storage.summary().await.failed, 1);

  // the page comes back on the next run
  let _fixed = serve(&mut server, path, QUESTION_PAPER).await;
  for paper in scraper.scrape_past_papers(&options).await? {
    storage.store_paper(&paper).await?;
  }

  let stored: Vec<ProcessedPaper> = storage.get_all_papers().await;
  assert_eq!(stored.len(), 1);
  assert!(!stored[0].is_failed());
  assert_eq!(stored[0].questions().map(<[_]>::len), Some(3));
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_index_failure_stores_nothing() -> TestResult<()> {
  let mut server = Server::new_async().await;
  let _index = server.mock("GET", "/psychology").with_status(404).create_async().await;

  let mut scraper = create_test_scraper(&server);
  let (storage, _dir) = create_test_storage().await;

  assert!(scraper.scrape_past_papers(&ScrapeOptions::new()).await.is_err());
  assert!(storage.get_all_papers().await.is_empty());
  Ok(())
}
