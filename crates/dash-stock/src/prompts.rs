//! Prompt templates sent to the language model

use crate::error::Result;
use minijinja::{Environment, context};

const RECOMMENDATION_TEMPLATE_NAME: &str = "stock.user.recommendation";

const RECOMMENDATION_TEMPLATE: &str = "Given the forecasted stock price of {{ symbol }} is ${{ price }} \
and the recent news sentiment is: {{ headlines }}. \
What investment action would you recommend?";

/// Render the recommendation request
///
/// The price is rendered with two decimals; the headlines are inserted as
/// given.
pub fn recommendation_prompt(symbol: &str, forecasted_price: f64, headlines: &str) -> Result<String> {
    let mut env = Environment::new();
    env.add_template(RECOMMENDATION_TEMPLATE_NAME, RECOMMENDATION_TEMPLATE)?;

    let rendered = env.get_template(RECOMMENDATION_TEMPLATE_NAME)?.render(context! {
        symbol => symbol,
        price => format!("{forecasted_price:.2}"),
        headlines => headlines,
    })?;

    Ok(rendered)
}
