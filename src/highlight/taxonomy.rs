use once_cell::sync::Lazy;
use regex::Regex;

pub struct SkillTier {
    pub name: &'static str,
    pub color: &'static str,
    pub terms: &'static [&'static str],
}

pub const TIERS: &[SkillTier] = &[
    SkillTier {
        name: "strong",
        color: "#0fe800",
        terms: &[
            "Go", "Golang", "Java", "Python", "C++", "C#", "Rust", "Kotlin", "Scala", "Ruby",
            "Swift", "Erlang", "Elixir", "Haskell", "PHP", "Objective-C",
        ],
    },
    SkillTier {
        name: "intermediate",
        color: "#f5ed00",
        terms: &[
            "Spring", "Spring Boot", "Spring MVC", "Spring Cloud", "Django",
            "Django REST Framework", "Flask", "Express", "NestJS", "Koa", "ASP.NET",
            "ASP.NET Core", "Blazor", "React", "React Native", "Vue.js", "Nuxt.js", "Svelte",
            "Angular", "Ember.js", "Backbone.js", "Meteor", "Ruby on Rails", "Laravel", "GraphQL",
            "REST", "gRPC", "WebSockets", "Next.js", "Gatsby",
        ],
    },
    SkillTier {
        name: "technologies",
        color: "#00aaff",
        terms: &[
            ".NET", "MS SQL", "Axapta", "MySQL", "PostgreSQL", "MongoDB", "Redis",
            "Elasticsearch", "Docker", "Kubernetes", "AWS", "Azure", "GCP", "Terraform",
            "Ansible", "Jenkins", "Git", "GitHub Actions",
        ],
    },
    SkillTier {
        name: "leadership",
        color: "#0073b1",
        terms: &[
            "Team Leadership", "Stakeholder Management", "Process Definition",
            "Strategy Development", "Roadmapping", "Budget Management", "KPI Tracking",
            "Change Management", "Outsourced Management", "Software Development Oversight",
            "Cross-functional Alignment",
        ],
    },
    SkillTier {
        name: "behaviors",
        color: "#ff7f6b",
        terms: &[
            "Problem Solving", "Decision Making", "Priority Management", "Attention to Detail",
            "Innovation", "Adaptability", "Mentoring", "Team Collaboration",
            "Cross-functional Communication", "Conflict Resolution", "Emotional Intelligence",
        ],
    },
    SkillTier {
        name: "itManagement",
        color: "#0073b1",
        terms: &[
            "ITIL", "ITSM", "COBIT", "ISO 20000", "ISO 27001", "ServiceNow", "BMC Remedy",
            "Cherwell", "Jira Service Desk", "ITOM", "SRE Practices", "Azure DevOps",
            "AWS CloudFormation", "Puppet", "Chef", "Nagios", "Splunk",
        ],
    },
    SkillTier {
        name: "governance",
        color: "#d2691e",
        terms: &[
            "PMP", "PRINCE2", "Six Sigma", "Lean IT", "CMMI", "TOGAF", "Enterprise Architecture",
            "Risk Management", "SOX Compliance", "GDPR", "HIPAA", "Business Continuity Planning",
            "Vendor Management", "Audit Management", "Agile Ceremonies", "Kanban", "SAFe", "Jira",
            "Confluence", "Agile",
        ],
    },
    SkillTier {
        name: "compensation",
        color: "#ffa500",
        terms: &[
            "Salary", "Wage", "Compensation", "Remuneration", "Pay", "Base Salary", "Bonus",
            "Equity", "Stock Options", "Benefits", "Overtime", "Incentives",
        ],
    },
];

pub struct CompiledTerm {
    pub tier: &'static SkillTier,
    pub pattern: Regex,
}

/// Case-insensitive literal matcher per term, in taxonomy order.
pub static COMPILED: Lazy<Vec<CompiledTerm>> = Lazy::new(|| {
    TIERS
        .iter()
        .flat_map(|tier| {
            tier.terms.iter().map(move |term| CompiledTerm {
                tier,
                pattern: Regex::new(&format!("(?i){}", regex::escape(term)))
                    .expect("escaped skill term is a valid regex"),
            })
        })
        .collect()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_term_compiles() {
        let total: usize = TIERS.iter().map(|tier| tier.terms.len()).sum();
        assert_eq!(COMPILED.len(), total);
        assert!(COMPILED.iter().any(|t| t.pattern.is_match("c++")));
    }
}
