use serde::Serialize;
use tracing::{debug, trace};

use crate::builder::BeanAssertBuilder;
use crate::errors::{BoxError, Failure};
use crate::AssertGroup;

/// Collects assertion groups and runs them together, aggregating every
/// group's failure into one report.
///
/// Collectors are themselves groups, so they compose into trees; a nested
/// collector's composite failure counts as a single constituent of its
/// parent, indented one level deeper.
#[derive(Default)]
pub struct AssertCollector {
    groups: Vec<Group>,
}

// Bean builders are stored inline so the registering factories can hand back
// a mutable borrow for further checks; everything else is boxed behind the
// trait.
enum Group {
    Bean(BeanAssertBuilder),
    Other(Box<dyn AssertGroup>),
}

impl AssertCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a group to run.
    pub fn add(&mut self, group: impl AssertGroup + 'static) {
        self.groups.push(Group::Other(Box::new(group)));
    }

    /// Drops every registered group, as if freshly constructed.
    pub fn reset(&mut self) {
        self.groups.clear();
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Runs all groups, then unconditionally resets, then reports the run's
    /// outcome.
    pub fn run_and_reset(&mut self) -> Result<(), Failure> {
        let result = self.run_assert();
        self.reset();
        result
    }

    /// Creates a [`BeanAssertBuilder`] around `bean`, registers it, and
    /// returns it for check registration.
    pub fn bean<T: Serialize + 'static>(&mut self, bean: T) -> &mut BeanAssertBuilder {
        self.push_bean(BeanAssertBuilder::of(bean))
    }

    /// Like [`bean`](Self::bean), with a name identifying the builder's
    /// failures.
    pub fn bean_named<T: Serialize + 'static>(
        &mut self,
        name: impl Into<String>,
        bean: T,
    ) -> &mut BeanAssertBuilder {
        self.push_bean(BeanAssertBuilder::of_named(name, bean))
    }

    /// Creates a builder around a root supplier, registers it, and returns
    /// it for check registration.
    pub fn bean_from<T, E, F>(&mut self, supplier: F) -> &mut BeanAssertBuilder
    where
        T: Serialize,
        E: Into<BoxError>,
        F: Fn() -> Result<T, E> + 'static,
    {
        self.push_bean(BeanAssertBuilder::new(supplier))
    }

    /// Like [`bean_from`](Self::bean_from), with a name.
    pub fn bean_from_named<T, E, F>(
        &mut self,
        name: impl Into<String>,
        supplier: F,
    ) -> &mut BeanAssertBuilder
    where
        T: Serialize,
        E: Into<BoxError>,
        F: Fn() -> Result<T, E> + 'static,
    {
        self.push_bean(BeanAssertBuilder::named(name, supplier))
    }

    fn push_bean(&mut self, builder: BeanAssertBuilder) -> &mut BeanAssertBuilder {
        self.groups.push(Group::Bean(builder));
        match self.groups.last_mut() {
            Some(Group::Bean(builder)) => builder,
            _ => unreachable!("a bean group was just pushed"),
        }
    }
}

impl AssertGroup for AssertCollector {
    fn run_assert(&self) -> Result<(), Failure> {
        trace!(groups = self.groups.len(), "running assertion groups");
        let mut failures = Vec::new();
        for group in &self.groups {
            let result = match group {
                Group::Bean(builder) => builder.run_assert(),
                Group::Other(group) => group.run_assert(),
            };
            if let Err(failure) = result {
                failures.push(failure);
            }
        }
        if !failures.is_empty() {
            debug!(count = failures.len(), "assertion groups failed");
        }
        Failure::finish(None, failures)
    }
}
