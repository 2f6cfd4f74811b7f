//! Technologies offered for `General` practice sessions.

/// A selectable technology: collection id plus display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Technology {
    pub id: &'static str,
    pub label: &'static str,
}

const fn tech(id: &'static str, label: &'static str) -> Technology {
    Technology { id, label }
}

pub const TECHNOLOGIES: &[Technology] = &[
    tech("javascript", "JavaScript"),
    tech("typescript", "TypeScript"),
    tech("react", "React"),
    tech("nextjs", "Next.js"),
    tech("nodejs", "Node.js"),
    tech("expressjs", "Express.js"),
    tech("nestjs", "Nest.js"),
    tech("python", "Python"),
    tech("django", "Django"),
    tech("flask", "Flask"),
    tech("fastapi", "FastAPI"),
    tech("cicd", "CI/CD"),
    tech("aws", "AWS"),
    tech("serverless", "Serverless"),
    tech("postgresql", "PostgreSQL"),
    tech("mongodb", "MongoDB"),
    tech("docker", "Docker"),
    tech("graphql", "GraphQL"),
    tech("apis", "APIs"),
    tech("celery", "Celery"),
    tech("csharp", "C#"),
    tech("rust", "Rust"),
    tech("golang", "Golang"),
    tech("gin", "Gin"),
    tech("databases", "Databases"),
];

/// Look up a technology by collection id.
#[must_use]
pub fn technology(id: &str) -> Option<&'static Technology> {
    TECHNOLOGIES.iter().find(|tech| tech.id == id)
}

/// Display label for a technology id, falling back to the id itself.
#[must_use]
pub fn technology_label(id: &str) -> &str {
    technology(id).map_or(id, |tech| tech.label)
}
