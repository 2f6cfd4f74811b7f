use prep_core::catalog::TECHNOLOGIES;
use prep_core::model::Category;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryOptionVm {
    pub category: Category,
    pub label: &'static str,
    pub description: &'static str,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TechnologyOptionVm {
    pub id: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Category and technology choices made on the selection page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionVm {
    category: Option<Category>,
    technologies: Vec<String>,
}

impl SelectionVm {
    #[must_use]
    pub fn category(&self) -> Option<Category> {
        self.category
    }

    #[must_use]
    pub fn technologies(&self) -> &[String] {
        &self.technologies
    }

    pub fn select_category(&mut self, category: Category) {
        self.category = Some(category);
    }

    /// Add or remove a technology, keeping selection order.
    pub fn toggle_technology(&mut self, id: &str) {
        if let Some(position) = self.technologies.iter().position(|tech| tech == id) {
            self.technologies.remove(position);
        } else {
            self.technologies.push(id.to_string());
        }
    }

    #[must_use]
    pub fn shows_technologies(&self) -> bool {
        self.category.is_some_and(Category::uses_technologies)
    }

    #[must_use]
    pub fn can_start(&self) -> bool {
        match self.category {
            Some(category) if category.uses_technologies() => !self.technologies.is_empty(),
            Some(_) => true,
            None => false,
        }
    }

    /// What to create a session with, once the choice is complete.
    #[must_use]
    pub fn start_request(&self) -> Option<(Category, Vec<String>)> {
        if !self.can_start() {
            return None;
        }
        let category = self.category?;
        let technologies = if category.uses_technologies() {
            self.technologies.clone()
        } else {
            Vec::new()
        };
        Some((category, technologies))
    }

    #[must_use]
    pub fn hint(&self) -> &'static str {
        match self.category {
            None => "Choose a category to begin.",
            Some(category) if category.uses_technologies() && self.technologies.is_empty() => {
                "Pick at least one technology."
            }
            Some(_) => "Ready when you are.",
        }
    }

    #[must_use]
    pub fn category_options(&self) -> Vec<CategoryOptionVm> {
        Category::ALL
            .into_iter()
            .map(|category| CategoryOptionVm {
                category,
                label: category.label(),
                description: category.description(),
                selected: self.category == Some(category),
            })
            .collect()
    }

    #[must_use]
    pub fn technology_options(&self) -> Vec<TechnologyOptionVm> {
        TECHNOLOGIES
            .iter()
            .map(|tech| TechnologyOptionVm {
                id: tech.id,
                label: tech.label,
                selected: self.technologies.iter().any(|selected| selected == tech.id),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_needs_a_technology() {
        let mut vm = SelectionVm::default();
        assert!(!vm.can_start());

        vm.select_category(Category::General);
        assert!(vm.shows_technologies());
        assert!(!vm.can_start());
        assert_eq!(vm.hint(), "Pick at least one technology.");

        vm.toggle_technology("rust");
        vm.toggle_technology("docker");
        assert_eq!(
            vm.start_request(),
            Some((Category::General, vec!["rust".to_string(), "docker".to_string()]))
        );

        vm.toggle_technology("rust");
        assert_eq!(vm.technologies(), ["docker"]);
    }

    #[test]
    fn fixed_categories_drop_technologies() {
        let mut vm = SelectionVm::default();
        vm.select_category(Category::General);
        vm.toggle_technology("python");
        vm.select_category(Category::Behaviour);

        assert!(!vm.shows_technologies());
        assert_eq!(vm.start_request(), Some((Category::Behaviour, Vec::new())));
    }

    #[test]
    fn options_reflect_selection() {
        let mut vm = SelectionVm::default();
        vm.select_category(Category::SystemsDesign);
        vm.toggle_technology("gin");

        let selected: Vec<_> = vm
            .category_options()
            .into_iter()
            .filter(|option| option.selected)
            .map(|option| option.label)
            .collect();
        assert_eq!(selected, ["Systems Design"]);
        assert!(
            vm.technology_options()
                .iter()
                .any(|option| option.id == "gin" && option.selected)
        );
    }
}
