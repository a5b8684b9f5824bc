use super::*;

#[test]
fn submission_parses_wire_shape() {
    let json = r#"{"nickname":"Ada","points":[[5,5]],"shape":[[0,0],[0,10],[10,10],[10,0]]}"#;
    let sub: Submission = serde_json::from_str(json).unwrap();
    assert_eq!(sub.nickname, "Ada");
    assert_eq!(sub.points, vec![GeoPoint::new(5.0, 5.0)]);
    assert_eq!(sub.shape.len(), 4);
    assert_eq!(sub.shape[2], GeoPoint::new(10.0, 10.0));
}

#[test]
fn missing_fields_default_to_empty() {
    let sub: Submission = serde_json::from_str("{}").unwrap();
    assert_eq!(sub, Submission::default());
}

#[test]
fn nickname_is_percent_decoded() {
    let job = RenderJob::from_submission(Submission {
        nickname: "Ji%C5%99%C3%AD%20Nov%C3%A1k".to_owned(),
        points: vec![],
        shape: vec![GeoPoint::new(0.0, 0.0)],
    })
    .unwrap();
    assert_eq!(job.nickname, "Jiří Novák");
}

#[test]
fn plus_is_not_a_space() {
    let job = RenderJob::from_submission(Submission {
        nickname: "a+b".to_owned(),
        ..Submission::default()
    })
    .unwrap();
    assert_eq!(job.nickname, "a+b");
}

#[test]
fn invalid_utf8_nickname_is_rejected() {
    let err = RenderJob::from_submission(Submission {
        nickname: "%FF%FE".to_owned(),
        ..Submission::default()
    })
    .unwrap_err();
    assert!(err.is_request_error());
}

#[test]
fn non_finite_points_are_rejected() {
    let err = RenderJob::new(
        "x",
        vec![GeoPoint::new(f64::NAN, 1.0)],
        vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)],
    )
    .unwrap_err();
    assert!(matches!(err, TracecardError::Validation(_)));
}

#[test]
fn empty_shape_is_left_for_the_projector() {
    let job = RenderJob::from_submission(Submission::default()).unwrap();
    assert!(job.shape.is_empty());
}
