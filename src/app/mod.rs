// Application layer: pipelines wiring the listing parser to the fetch and storage adapters.

pub mod pipelines;
