use gantry_build::executor::{CommandExecutor, CommandOutput, CommandSpec, ExecError};
use gantry_core::GantryConfig;
use gantry_pipeline::{DeployTarget, Pipeline, PipelineError, PipelineOutcome};
use gantry_transport::client::DeployClient;
use gantry_transport::service::{HttpError, HttpResponse, HttpService};
use mockall::mock;
use tempfile::TempDir;

mock! {
    Executor {}

    impl CommandExecutor for Executor {
        async fn exec(&self, spec: &CommandSpec) -> Result<CommandOutput, ExecError>;
    }
}

mock! {
    Service {}

    impl HttpService for Service {
        async fn post(
            &self,
            path: &str,
            content_type: &str,
            body: Vec<u8>,
        ) -> Result<HttpResponse, HttpError>;
    }
}

/// A project directory with a config tree, and a config pointing the run
/// workspace at a scratch dir we can inspect afterwards.
fn fixture() -> (TempDir, TempDir, GantryConfig) {
    let project = TempDir::new().unwrap();
    std::fs::create_dir_all(project.path().join("configs")).unwrap();
    std::fs::write(project.path().join("configs/app.env"), "PORT=8000\n").unwrap();

    let work = TempDir::new().unwrap();
    let mut config = GantryConfig::default();
    config.project.work_dir = Some(work.path().to_path_buf());

    (project, work, config)
}

fn ok_exec() -> Result<CommandOutput, ExecError> {
    Ok(CommandOutput {
        combined: String::new(),
    })
}

fn failed_exec(spec: &CommandSpec) -> Result<CommandOutput, ExecError> {
    Err(ExecError::CommandFailed {
        program: spec.program.clone(),
        args: spec.args.clone(),
        exit_code: Some(1),
        output: "boom\n".to_owned(),
    })
}

fn work_dir_is_empty(work: &TempDir) -> bool {
    std::fs::read_dir(work.path()).unwrap().next().is_none()
}

// ── Success path ──

#[tokio::test]
async fn successful_run_uploads_and_cleans_up() {
    let (project, work, config) = fixture();

    let mut executor = MockExecutor::new();
    executor
        .expect_exec()
        .withf(|spec| spec.program == "go")
        .returning(|_| ok_exec());

    let mut service = MockService::new();
    service
        .expect_post()
        .withf(|path, content_type, body| {
            path == "deploy"
                && content_type.starts_with("multipart/form-data; boundary=")
                // The posted body carries a real zip: local file header magic.
                && body.windows(4).any(|w| w == b"PK\x03\x04".as_slice())
                && String::from_utf8_lossy(body).contains("filename=\"app.zip\"")
        })
        .returning(|_, _, _| {
            Ok(HttpResponse {
                status: 200,
                body: "deployment accepted".to_owned(),
            })
        });

    let pipeline = Pipeline::with_parts(executor, DeployClient::with_service(service));
    let outcome = pipeline
        .run(project.path(), &config, DeployTarget::Remote)
        .await
        .unwrap();

    match outcome {
        PipelineOutcome::Uploaded { status, body } => {
            assert_eq!(status, 200);
            assert_eq!(body, "deployment accepted");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(work_dir_is_empty(&work));
}

#[tokio::test]
async fn non_2xx_upload_is_a_successful_run_with_the_status() {
    let (project, work, config) = fixture();

    let mut executor = MockExecutor::new();
    executor.expect_exec().returning(|_| ok_exec());

    let mut service = MockService::new();
    service.expect_post().returning(|_, _, _| {
        Ok(HttpResponse {
            status: 422,
            body: "bundle rejected: missing health check".to_owned(),
        })
    });

    let pipeline = Pipeline::with_parts(executor, DeployClient::with_service(service));
    let outcome = pipeline
        .run(project.path(), &config, DeployTarget::Remote)
        .await
        .unwrap();

    match outcome {
        PipelineOutcome::Uploaded { status, body } => {
            assert_eq!(status, 422);
            assert!(body.contains("missing health check"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(work_dir_is_empty(&work));
}

// ── Cleanup on stage failures ──

#[tokio::test]
async fn build_failure_short_circuits_and_cleans_up() {
    let (project, work, config) = fixture();

    let mut executor = MockExecutor::new();
    executor.expect_exec().returning(failed_exec);

    let mut service = MockService::new();
    service.expect_post().never();

    let pipeline = Pipeline::with_parts(executor, DeployClient::with_service(service));
    let err = pipeline
        .run(project.path(), &config, DeployTarget::Remote)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Build { .. }));
    assert_eq!(err.stage(), "build");
    assert!(work_dir_is_empty(&work));
}

#[tokio::test]
async fn missing_configs_fail_the_copy_stage_and_clean_up() {
    let project = TempDir::new().unwrap(); // no configs/ directory
    let work = TempDir::new().unwrap();
    let mut config = GantryConfig::default();
    config.project.work_dir = Some(work.path().to_path_buf());

    let mut executor = MockExecutor::new();
    executor.expect_exec().returning(|_| ok_exec());

    let mut service = MockService::new();
    service.expect_post().never();

    let pipeline = Pipeline::with_parts(executor, DeployClient::with_service(service));
    let err = pipeline
        .run(project.path(), &config, DeployTarget::Remote)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::CopyConfigs { .. }));
    assert!(work_dir_is_empty(&work));
}

#[tokio::test]
async fn upload_failure_cleans_up_the_package() {
    let (project, work, config) = fixture();

    let mut executor = MockExecutor::new();
    executor.expect_exec().returning(|_| ok_exec());

    let mut service = MockService::new();
    service.expect_post().returning(|_, _, _| {
        let source = reqwest::Client::new().get("not a url").build().unwrap_err();
        Err(HttpError::Request {
            service: "deployment".to_owned(),
            url: "http://deploy.internal/deploy".to_owned(),
            source,
        })
    });

    let pipeline = Pipeline::with_parts(executor, DeployClient::with_service(service));
    let err = pipeline
        .run(project.path(), &config, DeployTarget::Remote)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Upload { .. }));
    assert_eq!(err.stage(), "upload");
    assert!(work_dir_is_empty(&work));
}

#[tokio::test]
async fn unusable_work_dir_fails_workspace_setup() {
    let project = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();

    // A plain file where the work directory should be.
    let blocked = scratch.path().join("occupied");
    std::fs::write(&blocked, b"not a directory").unwrap();

    let mut config = GantryConfig::default();
    config.project.work_dir = Some(blocked);

    let mut executor = MockExecutor::new();
    executor.expect_exec().never();
    let mut service = MockService::new();
    service.expect_post().never();

    let pipeline = Pipeline::with_parts(executor, DeployClient::with_service(service));
    let err = pipeline
        .run(project.path(), &config, DeployTarget::Remote)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Workspace { .. }));
    assert_eq!(err.stage(), "workspace");
}

// ── Local image branch ──

#[tokio::test]
async fn local_image_run_builds_with_a_run_unique_tag() {
    let (project, work, config) = fixture();

    let mut executor = MockExecutor::new();
    executor
        .expect_exec()
        .withf(|spec| spec.program == "go")
        .returning(|_| ok_exec());
    executor
        .expect_exec()
        .withf(|spec| {
            spec.program == "docker"
                && spec.args.first().map(String::as_str) == Some("build")
                && spec.args.get(1).map(String::as_str) == Some("-t")
                && spec.args.get(2).is_some_and(|tag| tag.starts_with("app:"))
        })
        .returning(|_| ok_exec());

    let mut service = MockService::new();
    service.expect_post().never();

    let pipeline = Pipeline::with_parts(executor, DeployClient::with_service(service));
    let outcome = pipeline
        .run(project.path(), &config, DeployTarget::LocalImage)
        .await
        .unwrap();

    match outcome {
        PipelineOutcome::ImageBuilt { tag } => {
            assert!(tag.starts_with("app:"));
            assert!(tag.len() > "app:".len());
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(work_dir_is_empty(&work));
}

#[tokio::test]
async fn image_build_failure_cleans_extracted_tree_before_reporting() {
    let (project, work, config) = fixture();

    let mut executor = MockExecutor::new();
    executor
        .expect_exec()
        .withf(|spec| spec.program == "go")
        .returning(|_| ok_exec());
    executor
        .expect_exec()
        .withf(|spec| spec.program == "docker")
        .returning(failed_exec);

    let mut service = MockService::new();
    service.expect_post().never();

    let pipeline = Pipeline::with_parts(executor, DeployClient::with_service(service));
    let err = pipeline
        .run(project.path(), &config, DeployTarget::LocalImage)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::ImageBuild { .. }));
    assert!(work_dir_is_empty(&work));
}

// ── Concurrent isolation ──

#[tokio::test]
async fn concurrent_runs_are_isolated() {
    let (project, work, config) = fixture();

    let make_pipeline = || {
        let mut executor = MockExecutor::new();
        executor.expect_exec().returning(|_| ok_exec());
        let mut service = MockService::new();
        service.expect_post().returning(|_, _, _| {
            Ok(HttpResponse {
                status: 200,
                body: "ok".to_owned(),
            })
        });
        Pipeline::with_parts(executor, DeployClient::with_service(service))
    };

    let a = make_pipeline();
    let b = make_pipeline();

    let (ra, rb) = tokio::join!(
        a.run(project.path(), &config, DeployTarget::Remote),
        b.run(project.path(), &config, DeployTarget::Remote),
    );

    assert!(matches!(ra, Ok(PipelineOutcome::Uploaded { status: 200, .. })));
    assert!(matches!(rb, Ok(PipelineOutcome::Uploaded { status: 200, .. })));
    assert!(work_dir_is_empty(&work));
}
