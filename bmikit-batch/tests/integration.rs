use bmikit_batch::submit_reader;
use bmikit_client::MockClient;
use bmikit_model::bmi::evaluate;
use bmikit_model::measurement::{Gender, Measurement};
use mockall::predicate::eq;

#[tokio::test]
async fn submits_valid_rows_and_rejects_the_rest_locally() {
    let input = "\
Name,Age,Gender,Height(cm),Weight(kg)
Alice,34,Female,170,70
Bob,41,Male,0,80
Carol,45,,160,100
";
    let expected = vec![
        Measurement::new(Some("Alice".to_owned()), 34, Some(Gender::Female), 170.0, 70.0),
        Measurement::new(Some("Carol".to_owned()), 45, None, 160.0, 100.0),
    ];
    let results: Vec<_> = expected
        .iter()
        .map(|measurement| evaluate(measurement).unwrap())
        .collect();

    let mut client = MockClient::new();
    let returned = results.clone();
    client
        .expect_classify_batch()
        .with(eq(expected))
        .returning(move |_| Ok(returned.clone()));

    let outcome = submit_reader(input.as_bytes(), &client).await.unwrap();

    assert_eq!(outcome.results, results);
    assert_eq!(outcome.rejected.len(), 1);
    assert_eq!(outcome.rejected[0].line, 3);
    assert!(outcome.rejected[0].message.contains("positive"));
}

#[tokio::test]
async fn schema_mismatch_submits_nothing() {
    let input = "\
Name,Age,Gender,Height(cm)
Alice,34,Female,170
";
    let mut client = MockClient::new();
    client.expect_classify_batch().never();

    let error = submit_reader(input.as_bytes(), &client)
        .await
        .unwrap_err();
    assert!(error.to_string().contains("Weight(kg)"));
}

#[tokio::test]
async fn empty_table_still_round_trips_through_the_service() {
    let input = "Name,Age,Gender,Height(cm),Weight(kg)\n";

    let mut client = MockClient::new();
    client
        .expect_classify_batch()
        .with(eq(vec![]))
        .returning(|_| Ok(Vec::new()));

    let outcome = submit_reader(input.as_bytes(), &client).await.unwrap();
    assert!(outcome.results.is_empty());
    assert!(outcome.rejected.is_empty());
}
