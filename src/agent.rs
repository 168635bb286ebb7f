//! Inquiry assistant
//!
//! Answers customer questions from the active product list, through the
//! completion client when one is enabled, otherwise with a rule-based
//! reply built around the best-matching product. Every handled inquiry is
//! appended to the interaction log.

use std::cmp::Ordering;

use crate::config::Config;
use crate::data::{append_interaction, InteractionRecord};
use crate::llm::CompletionClient;
use crate::store::Product;

fn keyword_score(question: &str, product: &Product) -> usize {
    let haystack = format!(
        "{} {} {}",
        product.name, product.features, product.best_for
    )
    .to_lowercase();
    question
        .to_lowercase()
        .split_whitespace()
        .filter(|word| haystack.contains(*word))
        .count()
}

/// Pick the product whose name/features/best-for text overlaps the
/// question most; the cheapest product when nothing scores at all.
fn choose_product<'p>(question: &str, products: &'p [Product]) -> Option<&'p Product> {
    if products.is_empty() {
        return None;
    }

    let mut best = &products[0];
    let mut best_score = keyword_score(question, best);
    for product in &products[1..] {
        let score = keyword_score(question, product);
        if score > best_score {
            best = product;
            best_score = score;
        }
    }

    if best_score == 0 {
        products
            .iter()
            .min_by(|a, b| a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal))
    } else {
        Some(best)
    }
}

pub struct SalesAgent<'a> {
    products: Vec<Product>,
    client: &'a dyn CompletionClient,
    config: &'a Config,
}

impl<'a> SalesAgent<'a> {
    pub fn new(products: Vec<Product>, client: &'a dyn CompletionClient, config: &'a Config) -> Self {
        Self {
            products,
            client,
            config,
        }
    }

    fn product_context(&self) -> String {
        self.products
            .iter()
            .map(|p| {
                format!(
                    "- {} (${}): {} (Best for: {})",
                    p.name, p.price, p.features, p.best_for
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn fallback_reply(&self, question: &str, customer_name: &str) -> String {
        let company_email = &self.config.company.email;
        match choose_product(question, &self.products) {
            None => format!(
                "Hi {customer_name}, thanks for the question. Could you share your \
                 team size, budget, and timeline? You can also reach us at {company_email}."
            ),
            Some(product) => format!(
                "Hi {customer_name}, based on what you shared, {} could be a good fit. \
                 It is ${} and includes {}. A couple quick questions to help me guide \
                 you: what is your budget, how many users, and when do you want to \
                 start? If you want, I can set up a short demo or send more details. \
                 You can also reach us at {company_email}.",
                product.name, product.price, product.features
            ),
        }
    }

    /// Answer one inquiry and append it to the interaction log.
    pub fn handle_inquiry(&self, question: &str, customer_name: &str) -> String {
        if question.trim().is_empty() {
            return "Please provide a question so I can help.".to_string();
        }

        let system_prompt = format!(
            "You are a professional sales assistant for {}.\n\
             Your responsibilities:\n\
             1. Answer customer questions accurately\n\
             2. Recommend products based on needs\n\
             3. Ask clarifying questions when needed\n\
             4. Never invent features or prices\n\
             5. End with a clear next step\n\n\
             Available products:\n{}",
            self.config.company.name,
            self.product_context()
        );
        let user_prompt = format!("Customer name: {customer_name}\nQuestion: {question}");

        let response = self
            .client
            .complete(&system_prompt, &user_prompt)
            .unwrap_or_else(|| self.fallback_reply(question, customer_name));

        append_interaction(
            self.config,
            &InteractionRecord {
                customer: customer_name.to_string(),
                question: question.to_string(),
                response: response.clone(),
                status: "Completed".to_string(),
            },
        );

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ensure_data_files;
    use crate::llm::client_from_config;
    use tempfile::TempDir;

    fn product(name: &str, price: f64, features: &str, best_for: &str) -> Product {
        Product {
            id: 0,
            name: name.to_string(),
            sku: String::new(),
            category: String::new(),
            price,
            cost: 0.0,
            tax_rate: 0.0,
            unit: String::new(),
            description: String::new(),
            features: features.to_string(),
            best_for: best_for.to_string(),
            active: true,
        }
    }

    fn sample_products() -> Vec<Product> {
        vec![
            product("CRM Pro", 99.0, "Contact management, email tracking", "Small teams"),
            product("Analytics Suite", 149.0, "Dashboards, predictive insights", "Data teams"),
            product("Marketing Tool", 79.0, "Email campaigns, A/B testing", "Marketing teams"),
        ]
    }

    #[test]
    fn chooses_product_with_most_keyword_overlap() {
        let products = sample_products();
        let best = choose_product("we need dashboards for our data team", &products).unwrap();
        assert_eq!(best.name, "Analytics Suite");
    }

    #[test]
    fn falls_back_to_cheapest_when_nothing_scores() {
        let products = sample_products();
        let best = choose_product("xyzzy", &products).unwrap();
        assert_eq!(best.name, "Marketing Tool");
    }

    #[test]
    fn no_products_means_no_recommendation() {
        assert!(choose_product("anything", &[]).is_none());
    }

    #[test]
    fn blank_question_gets_a_prompt_for_detail() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.data.dir = dir.path().join("data").to_string_lossy().to_string();
        ensure_data_files(&config).unwrap();

        let client = client_from_config(&config.llm);
        let agent = SalesAgent::new(sample_products(), client.as_ref(), &config);
        assert_eq!(
            agent.handle_inquiry("   ", "Ada"),
            "Please provide a question so I can help."
        );
    }

    #[test]
    fn disabled_client_yields_rule_based_reply_and_logs_it() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.data.dir = dir.path().join("data").to_string_lossy().to_string();
        ensure_data_files(&config).unwrap();

        let client = client_from_config(&config.llm);
        let agent = SalesAgent::new(sample_products(), client.as_ref(), &config);
        let reply = agent.handle_inquiry("do you have email tracking?", "Ada");

        assert!(reply.contains("CRM Pro"));
        assert!(reply.contains(&config.company.email));

        let mut reader = csv::Reader::from_path(config.interactions_file()).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][1], "Ada");
        assert_eq!(&rows[0][2], "do you have email tracking?");
    }
}
