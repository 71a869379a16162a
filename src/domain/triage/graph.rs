//! QuestionGraph - immutable lookup and edge resolution.
//!
//! A graph is validated once at construction: ids are unique, every edge
//! (including each target a dynamic edge declares) lands on a defined
//! question or the terminal marker, and no path revisits a question.
//! After that, `get` and `resolve` are pure lookups.

use std::collections::{HashMap, HashSet, VecDeque};

use thiserror::Error;

use super::answers::{AnswerValue, Answers, DerivedField};
use super::question::{Edge, Question, QuestionId, QuestionKind, TERMINAL_ID};

/// Defects in the graph definition itself, never user errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphIntegrityError {
    #[error("Unknown question: {0}")]
    UnknownQuestion(QuestionId),

    #[error("Question defined twice: {0}")]
    DuplicateQuestion(QuestionId),

    #[error("Entry question is not defined: {0}")]
    MissingEntry(QuestionId),

    #[error("Question id is reserved: {0}")]
    ReservedId(QuestionId),

    #[error("Edge from {from} points to undefined question {to}")]
    DanglingEdge { from: QuestionId, to: QuestionId },

    #[error("Dynamic edge from {from} returned undeclared target {to}")]
    UndeclaredTarget { from: QuestionId, to: QuestionId },

    #[error("Dynamic edge from {0} declares no targets")]
    NoTargets(QuestionId),

    #[error("Single-choice question has no options: {0}")]
    NoOptions(QuestionId),

    #[error("Question {0} can be reached again from itself")]
    Cycle(QuestionId),
}

/// Immutable question graph with a designated entry question.
#[derive(Debug)]
pub struct QuestionGraph {
    entry: QuestionId,
    questions: HashMap<QuestionId, Question>,
    order: Vec<QuestionId>,
}

impl QuestionGraph {
    /// Builds and validates a graph.
    ///
    /// # Errors
    ///
    /// Returns the first `GraphIntegrityError` found.
    pub fn new(
        entry: impl Into<QuestionId>,
        questions: Vec<Question>,
    ) -> Result<Self, GraphIntegrityError> {
        let entry = entry.into();
        let mut by_id = HashMap::with_capacity(questions.len());
        let mut order = Vec::with_capacity(questions.len());

        for question in questions {
            if question.id.as_str() == TERMINAL_ID
                || DerivedField::from_key(question.id.as_str()).is_some()
            {
                return Err(GraphIntegrityError::ReservedId(question.id));
            }
            if question.kind == QuestionKind::SingleChoice && question.options.is_empty() {
                return Err(GraphIntegrityError::NoOptions(question.id));
            }
            if by_id.contains_key(&question.id) {
                return Err(GraphIntegrityError::DuplicateQuestion(question.id));
            }
            order.push(question.id.clone());
            by_id.insert(question.id.clone(), question);
        }

        if !by_id.contains_key(&entry) {
            return Err(GraphIntegrityError::MissingEntry(entry));
        }

        let graph = Self {
            entry,
            questions: by_id,
            order,
        };
        graph.check_edges()?;
        graph.check_acyclic()?;
        Ok(graph)
    }

    fn check_edges(&self) -> Result<(), GraphIntegrityError> {
        for question in self.questions() {
            for edge in question.edges() {
                if edge.targets().is_empty() {
                    return Err(GraphIntegrityError::NoTargets(question.id.clone()));
                }
                for target in edge.targets() {
                    if !target.is_complete() && !self.contains(target.as_str()) {
                        return Err(GraphIntegrityError::DanglingEdge {
                            from: question.id.clone(),
                            to: target.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    // Iterative three-colour DFS over every declared edge.
    fn check_acyclic(&self) -> Result<(), GraphIntegrityError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Open,
            Done,
        }

        let mut marks: HashMap<&str, Mark> = HashMap::new();
        for root in &self.order {
            if marks.contains_key(root.as_str()) {
                continue;
            }
            let mut stack: Vec<(&QuestionId, Vec<&QuestionId>)> =
                vec![(root, self.successors(root))];
            marks.insert(root.as_str(), Mark::Open);

            while let Some(frame) = stack.last_mut() {
                let node = frame.0;
                match frame.1.pop() {
                    Some(next) => match marks.get(next.as_str()) {
                        Some(Mark::Open) => return Err(GraphIntegrityError::Cycle(next.clone())),
                        Some(Mark::Done) => {}
                        None => {
                            marks.insert(next.as_str(), Mark::Open);
                            stack.push((next, self.successors(next)));
                        }
                    },
                    None => {
                        marks.insert(node.as_str(), Mark::Done);
                        stack.pop();
                    }
                }
            }
        }
        Ok(())
    }

    fn successors(&self, id: &QuestionId) -> Vec<&QuestionId> {
        self.questions
            .get(id)
            .map(|question| {
                question
                    .edges()
                    .flat_map(|edge| edge.targets())
                    .filter(|target| !target.is_complete())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The designated first question.
    pub fn entry(&self) -> &QuestionId {
        &self.entry
    }

    /// Looks up a question.
    ///
    /// # Errors
    ///
    /// Returns `UnknownQuestion` if `id` is not defined.
    pub fn get(&self, id: &str) -> Result<&Question, GraphIntegrityError> {
        self.questions
            .get(id)
            .ok_or_else(|| GraphIntegrityError::UnknownQuestion(QuestionId::new(id)))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.questions.contains_key(id)
    }

    /// Questions in definition order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.order.iter().filter_map(|id| self.questions.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Computes the id that follows answering `id` with `value`.
    ///
    /// Resolution order: the selected option's own edge (single-choice
    /// only), then the question's default edge, then the terminal marker.
    pub fn resolve(
        &self,
        id: &str,
        value: &AnswerValue,
        answers: &Answers,
    ) -> Result<QuestionId, GraphIntegrityError> {
        let question = self.get(id)?;
        let option_edge = match question.kind {
            QuestionKind::SingleChoice => value
                .as_text()
                .and_then(|selected| question.find_option(selected))
                .and_then(|option| option.next.as_ref()),
            QuestionKind::FreeText | QuestionKind::Boolean => None,
        };
        self.follow(question, option_edge.or(question.default_next.as_ref()), answers)
    }

    /// Resolves `id` as if no option were selected.
    pub fn resolve_default(
        &self,
        id: &str,
        answers: &Answers,
    ) -> Result<QuestionId, GraphIntegrityError> {
        let question = self.get(id)?;
        self.follow(question, question.default_next.as_ref(), answers)
    }

    fn follow(
        &self,
        from: &Question,
        edge: Option<&Edge>,
        answers: &Answers,
    ) -> Result<QuestionId, GraphIntegrityError> {
        let Some(edge) = edge else {
            return Ok(QuestionId::complete());
        };
        let target = edge.evaluate(answers);
        if edge.is_dynamic() && !edge.targets().contains(&target) {
            return Err(GraphIntegrityError::UndeclaredTarget {
                from: from.id.clone(),
                to: target,
            });
        }
        if !target.is_complete() && !self.contains(target.as_str()) {
            return Err(GraphIntegrityError::DanglingEdge {
                from: from.id.clone(),
                to: target,
            });
        }
        Ok(target)
    }

    /// Evaluates the visibility predicate of `id` against the full answer set.
    pub fn is_visible(&self, id: &str, answers: &Answers) -> Result<bool, GraphIntegrityError> {
        Ok(self.get(id)?.is_visible(answers))
    }

    /// Every question reachable from the entry over declared edges, in discovery order.
    pub fn reachable(&self) -> Vec<QuestionId> {
        let mut seen: HashSet<&QuestionId> = HashSet::new();
        let mut queue: VecDeque<&QuestionId> = VecDeque::new();
        let mut found = Vec::new();

        seen.insert(&self.entry);
        queue.push_back(&self.entry);
        while let Some(id) = queue.pop_front() {
            found.push(id.clone());
            for next in self.successors(id) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        found
    }
}
