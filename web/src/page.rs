use minijinja::{context, Environment};

const INDEX_TEMPLATE: &str = "index.html";

/// Renders the single question/answer page.
///
/// The template name ends in `.html`, so minijinja escapes every interpolated value.
pub struct Page {
    env: Environment<'static>,
    title: String,
}

impl Page {
    pub fn new(title: impl Into<String>) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(INDEX_TEMPLATE, include_str!("../templates/index.html"))?;
        Ok(Self {
            env,
            title: title.into(),
        })
    }

    /// Renders the page; `answer` is `None` before the first submission
    pub fn render(
        &self,
        model: &str,
        query: &str,
        answer: Option<&str>,
    ) -> Result<String, minijinja::Error> {
        self.env.get_template(INDEX_TEMPLATE)?.render(context! {
            title => &self.title,
            model => model,
            query => query,
            answer => answer,
        })
    }
}
