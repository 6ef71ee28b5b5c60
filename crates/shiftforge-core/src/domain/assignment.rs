//! The solved boolean decision surface.

/// Value of every assignment variable, keyed by (employee, day, template).
///
/// Values are laid out employee-major, then day, then catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    employees: usize,
    days: usize,
    templates: usize,
    values: Vec<bool>,
}

impl Assignment {
    /// All variables false: every employee rests every day.
    pub fn empty(employees: usize, days: usize, templates: usize) -> Self {
        Self {
            employees,
            days,
            templates,
            values: vec![false; employees * days * templates],
        }
    }

    /// Builds an assignment by evaluating `value(employee, day, template)`.
    pub fn from_fn(
        employees: usize,
        days: usize,
        templates: usize,
        mut value: impl FnMut(usize, usize, usize) -> bool,
    ) -> Self {
        let mut values = Vec::with_capacity(employees * days * templates);
        for e in 0..employees {
            for d in 0..days {
                for k in 0..templates {
                    values.push(value(e, d, k));
                }
            }
        }
        Self {
            employees,
            days,
            templates,
            values,
        }
    }

    #[inline]
    pub fn index(&self, employee: usize, day: usize, template: usize) -> usize {
        (employee * self.days + day) * self.templates + template
    }

    pub fn get(&self, employee: usize, day: usize, template: usize) -> bool {
        self.values[self.index(employee, day, template)]
    }

    pub fn set(&mut self, employee: usize, day: usize, template: usize, value: bool) {
        let index = self.index(employee, day, template);
        self.values[index] = value;
    }

    /// First template, in catalog order, assigned to the employee that day.
    pub fn shift_index(&self, employee: usize, day: usize) -> Option<usize> {
        (0..self.templates).find(|&k| self.get(employee, day, k))
    }

    /// Number of templates assigned to the employee that day.
    pub fn assigned_count(&self, employee: usize, day: usize) -> usize {
        (0..self.templates)
            .filter(|&k| self.get(employee, day, k))
            .count()
    }

    /// Number of shifts assigned to the employee over the horizon.
    pub fn shift_count(&self, employee: usize) -> usize {
        let start = self.index(employee, 0, 0);
        let end = start + self.days * self.templates;
        self.values[start..end].iter().filter(|&&v| v).count()
    }

    pub fn employee_count(&self) -> usize {
        self.employees
    }

    pub fn day_count(&self) -> usize {
        self.days
    }

    pub fn template_count(&self) -> usize {
        self.templates
    }

    pub fn values(&self) -> &[bool] {
        &self.values
    }
}
