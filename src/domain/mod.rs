// Domain layer - Datasets, classification policies and chart figures
pub mod classification;
pub mod dataset;
pub mod error;
pub mod figure;
