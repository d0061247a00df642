use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::Client as S3Client;
use course_etl::config::lambda::{LambdaConfig, S3Storage};
use course_etl::utils::{logger, validation::Validate};
use course_etl::{CoursePipeline, EtlEngine};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};

/// Event fields override the environment configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Request {
    pub campuses: Option<Vec<String>>,
    pub terms: Option<Vec<String>>,
    pub subjects: Option<Vec<String>>,
    pub s3_bucket: Option<String>,
    pub s3_prefix: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub message: String,
    pub output_path: String,
    pub sections_loaded: usize,
}

fn apply_overrides(mut config: LambdaConfig, request: Request) -> LambdaConfig {
    if let Some(campuses) = request.campuses {
        config.campuses = campuses;
    }
    if let Some(terms) = request.terms {
        config.terms = terms;
    }
    if let Some(subjects) = request.subjects {
        config.subjects = subjects;
    }
    if let Some(prefix) = request.s3_prefix {
        config.s3_prefix = prefix;
    }
    config
}

async fn function_handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    tracing::info!("Starting course ETL Lambda function");

    let request = event.payload;

    // S3_BUCKET 為必填，事件可以代替環境變數提供
    if let Some(bucket) = &request.s3_bucket {
        std::env::set_var("S3_BUCKET", bucket);
    }

    let lambda_config = apply_overrides(LambdaConfig::from_env()?, request);
    lambda_config.validate()?;

    let aws = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let s3_config = aws_sdk_s3::config::Builder::from(&aws)
        .region(Region::new(lambda_config.s3_region.clone()))
        .force_path_style(true)
        .build();
    let s3_client = S3Client::from_conf(s3_config);

    let storage = S3Storage::new(
        s3_client,
        lambda_config.s3_bucket.clone(),
        lambda_config.s3_prefix.clone(),
    );
    let bucket = lambda_config.s3_bucket.clone();
    let pipeline = CoursePipeline::new(storage, lambda_config)?;

    let summary = EtlEngine::new(pipeline).run().await?;

    tracing::info!(
        "Course ETL Lambda function completed: {} sections",
        summary.sections_loaded
    );

    Ok(Response {
        message: "Course ETL completed successfully".to_string(),
        output_path: format!("s3://{}/{}", bucket, summary.output_path),
        sections_loaded: summary.sections_loaded,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}
