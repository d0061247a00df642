pub mod course_pipeline;
