//! The orchestrator.
//!
//! A [`Pilot`] runs test bodies, stores their [`TestRecord`]s under a locked [`RunId`] and
//! keeps a "current" pointer to the last one, which assertion helpers judge against when
//! no id is given. It also owns the resource, helper and class registries.
//!
//! Every method takes `&self`. Bodies and helpers may borrow the pilot they run on, to read
//! a resource or even start a nested run, because no internal borrow is held while user
//! code executes.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    rc::Rc,
};

use crate::{
    Value,
    config::Config,
    error::{Error, Result},
    helper::{
        Helper, HelperRegistry, catalog,
        standard::{instance_helpers, standard_helpers},
    },
    id::{RunId, RunIdSequence},
    invoke::{Class, ClassRegistry, MethodCall},
    outcome::Outcome,
    report::{ReportData, ReportFormatter},
    resource::Resources,
    stats::Stats,
    test::{Judgment, TestFn, TestRecord},
};

#[derive(Debug)]
pub struct Pilot {
    title: String,
    ids: RunIdSequence,
    records: RefCell<Vec<Rc<TestRecord>>>,
    index: RefCell<HashMap<RunId, usize>>,
    current: RefCell<Option<RunId>>,
    resources: RefCell<Resources>,
    helpers: RefCell<HelperRegistry>,
    classes: RefCell<ClassRegistry>,
    passed_assertions: Cell<u64>,
    failed_assertions: Cell<u64>,
}

impl Pilot {
    /// Create a pilot with its own id sequence.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_sequence(title, RunIdSequence::new())
    }

    /// Create a pilot drawing unlabelled ids from `ids`.
    ///
    /// Pass clones of one root sequence to every pilot of a session to keep their
    /// unlabelled ids apart.
    pub fn with_sequence(title: impl Into<String>, ids: RunIdSequence) -> Self {
        Self {
            title: title.into(),
            ids,
            records: RefCell::default(),
            index: RefCell::default(),
            current: RefCell::default(),
            resources: RefCell::default(),
            helpers: RefCell::default(),
            classes: RefCell::default(),
            passed_assertions: Cell::new(0),
            failed_assertions: Cell::new(0),
        }
    }

    /// Create a pilot with the title and helpers described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let pilot = Self::new(config.project.title.as_str());
        if config.helpers.standard {
            pilot.inject_standard_helpers();
        }
        for path in &config.helpers.catalogs {
            pilot.inject_helpers(path)?;
        }
        Ok(pilot)
    }

    pub fn project_title(&self) -> &str {
        &self.title
    }

    /// Run `test` under the id `id`.
    ///
    /// Fails with [`Error::DuplicateId`] before running anything if `id` was used already.
    pub fn run<F: TestFn>(
        &self,
        id: impl Into<RunId>,
        test: F,
        description: impl Into<String>,
    ) -> Result<RunId> {
        self.run_with(Some(id.into()), test, description)
    }

    /// Run `test` under the next free id of the sequence.
    pub fn run_unlabelled<F: TestFn>(
        &self,
        test: F,
        description: impl Into<String>,
    ) -> Result<RunId> {
        self.run_with(None, test, description)
    }

    pub fn run_with<F: TestFn>(
        &self,
        id: Option<RunId>,
        test: F,
        description: impl Into<String>,
    ) -> Result<RunId> {
        if let Some(id) = &id {
            self.ensure_unused(id)?;
        }
        let record = TestRecord::capture(test, description);
        self.store(id, record)
    }

    /// Resolve `call` through the registered classes and run it like any other body.
    ///
    /// Nothing is constructed or called unless the id is free and the call resolves.
    pub fn run_class_method(
        &self,
        id: Option<RunId>,
        call: MethodCall,
        description: impl Into<String>,
    ) -> Result<RunId> {
        if let Some(id) = &id {
            self.ensure_unused(id)?;
        }
        let thunk = self.classes.borrow().prepare(call)?;
        let record = TestRecord::capture(thunk, description);
        self.store(id, record)
    }

    pub fn register_class<T: 'static>(&self, class: Class<T>) {
        self.classes.borrow_mut().register(class);
    }

    fn ensure_unused(&self, id: &RunId) -> Result<()> {
        match self.index.borrow().contains_key(id) {
            true => Err(Error::DuplicateId(id.clone())),
            false => Ok(()),
        }
    }

    fn next_free_id(&self) -> RunId {
        loop {
            let id = self.ids.next_id();
            match self.index.borrow().contains_key(&id) {
                true => tracing::warn!("unlabelled id {id} is taken by an explicit run, skipping"),
                false => return id,
            }
        }
    }

    fn store(&self, id: Option<RunId>, record: TestRecord) -> Result<RunId> {
        // checked again, the body itself may have claimed the id
        let id = match id {
            Some(id) => {
                self.ensure_unused(&id)?;
                id
            }
            None => self.next_free_id(),
        };
        record.set_id(id.clone())?;

        tracing::debug!(
            "stored run {id} ({}) after {}ms",
            record.description(),
            record.millis()
        );
        let mut records = self.records.borrow_mut();
        self.index.borrow_mut().insert(id.clone(), records.len());
        records.push(Rc::new(record));
        drop(records);

        *self.current.borrow_mut() = Some(id.clone());
        Ok(id)
    }

    /// Resolve the id to judge against: `explicit` if it is known, else the current one.
    pub fn current_id(&self, explicit: Option<&RunId>) -> Result<RunId> {
        match explicit {
            Some(id) => match self.index.borrow().contains_key(id) {
                true => Ok(id.clone()),
                false => Err(Error::UnknownId(id.clone())),
            },
            None => self.current.borrow().clone().ok_or(Error::NoTestRan),
        }
    }

    pub fn record(&self, id: &RunId) -> Result<Rc<TestRecord>> {
        let index = self
            .index
            .borrow()
            .get(id)
            .copied()
            .ok_or_else(|| Error::UnknownId(id.clone()))?;
        Ok(Rc::clone(&self.records.borrow()[index]))
    }

    /// The record assertions currently apply to.
    pub fn current(&self) -> Result<Rc<TestRecord>> {
        let id = self.current_id(None)?;
        self.record(&id)
    }

    /// Every record, in the order they ran.
    pub fn records(&self) -> Vec<Rc<TestRecord>> {
        self.records.borrow().clone()
    }

    /// Point the current record at `id`.
    pub fn set_current_to(&self, id: impl Into<RunId>) -> Result<()> {
        let id = self.current_id(Some(&id.into()))?;
        tracing::debug!("current run is now {id}");
        *self.current.borrow_mut() = Some(id);
        Ok(())
    }

    /// Append `judgment` to the record `id` (or the current one) and count it.
    pub fn record_on(&self, id: Option<&RunId>, judgment: Judgment) -> Result<()> {
        let id = self.current_id(id)?;
        let record = self.record(&id)?;

        let passed = judgment.passed;
        tracing::trace!(
            "run {id}: {} {}",
            judgment.label.as_deref().unwrap_or("assertion"),
            match passed {
                true => "passed",
                false => "failed",
            }
        );
        if !record.push_judgment(judgment) {
            return Err(Error::RecordBusy(id));
        }

        let counter = match passed {
            true => &self.passed_assertions,
            false => &self.failed_assertions,
        };
        counter.set(counter.get() + 1);
        Ok(())
    }

    pub fn record_success(&self, label: Option<&str>) -> Result<()> {
        self.record_on(None, Judgment::success(label))
    }

    pub fn record_failure(&self, expected: impl Into<Value>, label: Option<&str>) -> Result<()> {
        self.record_on(None, Judgment::failure(expected, label))
    }

    /// Judge the current outcome with an ad-hoc predicate.
    pub fn assert_that(
        &self,
        predicate: impl FnOnce(&Outcome) -> bool,
        label: Option<&str>,
        expected: impl Into<Value>,
    ) -> Result<()> {
        let record = self.current()?;
        match predicate(record.outcome()) {
            true => self.record_success(label),
            false => self.record_failure(expected, label),
        }
    }

    pub fn add_resource(&self, name: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let name = name.into();
        self.resources.borrow_mut().add(name.clone(), value)?;
        tracing::debug!("added resource {name}");
        Ok(())
    }

    pub fn override_resource(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.resources.borrow_mut().override_with(name, value)?;
        tracing::debug!("overrode resource {name}");
        Ok(())
    }

    /// A copy of the resource `name`.
    pub fn resource(&self, name: &str) -> Result<Value> {
        self.resources.borrow().get(name).cloned()
    }

    pub fn remove_resource(&self, name: &str) -> Result<Value> {
        let value = self.resources.borrow_mut().remove(name)?;
        tracing::debug!("removed resource {name}");
        Ok(value)
    }

    pub fn has_resource(&self, name: &str) -> bool {
        self.resources.borrow().contains(name)
    }

    /// Register `helper` under `name`, replacing any helper of that name.
    pub fn add_helper(&self, name: impl Into<String>, helper: impl Helper + 'static) {
        let name = name.into();
        match self.helpers.borrow_mut().register(name.clone(), helper) {
            true => tracing::debug!("replaced helper {name}"),
            false => tracing::debug!("added helper {name}"),
        }
    }

    pub fn add_helpers<N, H>(&self, helpers: impl IntoIterator<Item = (N, H)>)
    where
        N: Into<String>,
        H: Helper + 'static,
    {
        for (name, helper) in helpers {
            self.add_helper(name, helper);
        }
    }

    pub fn inject_standard_helpers(&self) {
        self.add_helpers(standard_helpers());
        self.add_helpers(instance_helpers());
    }

    /// Register every helper of the catalog file at `path`, returning how many there were.
    pub fn inject_helpers(&self, path: impl AsRef<Path>) -> Result<usize> {
        let helpers = catalog::load(path.as_ref())?;
        let count = helpers.len();
        self.add_helpers(helpers);
        tracing::debug!("injected {count} helpers from {}", path.as_ref().display());
        Ok(count)
    }

    pub fn has_helper(&self, name: &str) -> bool {
        self.helpers.borrow().contains(name)
    }

    /// Call the helper registered as `name`.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<()> {
        let helper = self.helpers.borrow().get(name)?;
        helper.call(self, args)
    }

    /// Statistics of everything recorded so far.
    pub fn stats(&self) -> Stats {
        Stats::collect(
            self.records.borrow().iter().map(Rc::as_ref),
            self.passed_assertions.get(),
            self.failed_assertions.get(),
        )
    }

    pub fn create_report(&self, formatter: &dyn ReportFormatter, out: &mut dyn Write) -> Result<()> {
        let records = self.records.borrow();
        let data = ReportData::new(&self.title, self.stats(), &records);
        formatter.render(&data, out)?;
        Ok(())
    }

    /// Render a report into the file at `path`, creating or truncating it.
    pub fn save_report(&self, formatter: &dyn ReportFormatter, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut out = BufWriter::new(File::create(path)?);
        self.create_report(formatter, &mut out)?;
        out.flush()?;
        tracing::debug!("report written to {}", path.display());
        Ok(())
    }
}
