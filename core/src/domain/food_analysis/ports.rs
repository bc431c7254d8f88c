use std::future::Future;

use crate::domain::{
    common::entities::app_errors::CoreError, food_analysis::entities::FoodAnalysisResult,
};

/// Service trait for food photo analysis
pub trait FoodAnalysisService: Send + Sync {
    fn analyze_food(
        &self,
        image_data: Vec<u8>,
    ) -> impl Future<Output = Result<FoodAnalysisResult, CoreError>> + Send;
}
