//! The marketing posts crew: three agents that research a customer, shape a
//! marketing strategy and draft campaign copy.

use std::sync::Arc;

use crate::agent::{Agent, AgentModelConfig};
use crate::crew::crew::Crew;
use crate::llm::CompletionProvider;
use crate::task::Task;
use crate::tools::Tool;

pub struct MarketingPostsCrew {
    provider: Arc<dyn CompletionProvider>,
    tools: Vec<Arc<dyn Tool>>,
    model: AgentModelConfig,
    verbose: bool,
}

impl MarketingPostsCrew {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        tools: Vec<Arc<dyn Tool>>,
        model: AgentModelConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            model,
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn lead_market_analyst(&self) -> Agent {
        Agent::new(
            "Lead Market Analyst",
            "Conduct a thorough analysis of the products and competitors around \
             {customer_domain}, providing in-depth insights to guide the marketing strategy.",
            "As the Lead Market Analyst at a premier digital marketing firm, you specialize \
             in dissecting online business landscapes and distilling them into actionable \
             findings.",
            self.model.clone(),
            self.tools.clone(),
            Arc::clone(&self.provider),
        )
        .with_verbose(self.verbose)
    }

    fn chief_marketing_strategist(&self) -> Agent {
        Agent::new(
            "Chief Marketing Strategist",
            "Synthesize the research into a compelling marketing strategy for \
             {customer_domain}.",
            "You are the Chief Marketing Strategist at a leading digital marketing agency, \
             known for crafting bespoke strategies that drive measurable results.",
            self.model.clone(),
            self.tools.clone(),
            Arc::clone(&self.provider),
        )
        .with_verbose(self.verbose)
    }

    fn creative_content_creator(&self) -> Agent {
        Agent::new(
            "Creative Content Creator",
            "Develop compelling and innovative content for social media campaigns, with a \
             focus on creating high-impact ad copy.",
            "As a Creative Content Creator at a top-tier digital marketing agency, you excel \
             in crafting narratives that resonate with audiences. Your expertise lies in \
             turning marketing strategies into engaging stories and visual content that \
             capture attention and inspire action.",
            self.model.clone(),
            // The writer works from the strategist's output, no research tools.
            Vec::new(),
            Arc::clone(&self.provider),
        )
        .with_verbose(self.verbose)
    }

    /// Assemble the crew. Agent and task templates reference
    /// `{customer_domain}` and `{project_description}` from the run inputs.
    pub fn crew(&self) -> Crew {
        let analyst = self.lead_market_analyst();
        let strategist = self.chief_marketing_strategist();
        let creative = self.creative_content_creator();

        Crew::new("marketing posts crew")
            .add_step(
                analyst,
                Task::new(
                    "Conduct thorough research about the customer at {customer_domain} and \
                     its competitors in the context of this project: {project_description}. \
                     Gather any relevant information about products, customer demographics \
                     and market positioning. Make sure you find current, interesting and \
                     relevant information.",
                    "A complete report on the customer, their customers and their \
                     competitors, including demographics, preferences, market positioning \
                     and audience engagement.",
                ),
            )
            .add_step(
                strategist.clone(),
                Task::new(
                    "Understand the project you are working on: {project_description}. \
                     Review any provided materials and research the customer at \
                     {customer_domain} further if needed to pin down the scope and the \
                     target audience.",
                    "A detailed summary of the project and a profile of its target \
                     audience.",
                ),
            )
            .add_step(
                strategist,
                Task::new(
                    "Formulate a comprehensive marketing strategy for the project \
                     {project_description} of the customer {customer_domain}. Use the \
                     insights from the research and the project understanding to build a \
                     high-quality strategy.",
                    "A detailed marketing strategy document that outlines goals, target \
                     audience, key messages and proposed tactics, with name, tactics, \
                     channels and KPIs.",
                ),
            )
            .add_step(
                creative.clone(),
                Task::new(
                    "Develop creative marketing campaign ideas for {project_description}. \
                     Make sure the ideas are innovative, engaging and aligned with the \
                     overall marketing strategy.",
                    "A list of 5 campaign ideas, each with a short description and its \
                     expected audience impact.",
                ),
            )
            .add_step(
                creative,
                Task::new(
                    "Create marketing copy based on the approved campaign ideas for \
                     {project_description}. Write clear, compelling posts for each campaign \
                     idea.",
                    "Marketing copy for each campaign idea, ready to publish.",
                ),
            )
    }
}
