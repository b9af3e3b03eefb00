//! Controller and endpoint recognition.
//!
//! Both decisions rest on one primitive, [`annotation_name_matches`], which
//! treats `@RestController` and `@org.springframework...RestController` alike.

use crate::model::{Annotation, DeclaredType, MethodDeclaration};

pub trait Indicator: Copy + PartialEq + 'static {
    const ALL: &'static [Self];

    fn name(self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|i| i.name() == name)
    }
}

/// Class-level annotations marking a request-handling type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerIndicator {
    Controller,
    RestController,
    Path,
    ApplicationPath,
    Service,
}

impl Indicator for ControllerIndicator {
    const ALL: &'static [Self] = &[
        Self::Controller,
        Self::RestController,
        Self::Path,
        Self::ApplicationPath,
        Self::Service,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Controller => "Controller",
            Self::RestController => "RestController",
            Self::Path => "Path",
            Self::ApplicationPath => "ApplicationPath",
            Self::Service => "Service",
        }
    }
}

/// Method-level annotations marking a request-handling operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointIndicator {
    GetMapping,
    PostMapping,
    PutMapping,
    DeleteMapping,
    PatchMapping,
    RequestMapping,
    ResponseBody,
}

impl Indicator for EndpointIndicator {
    const ALL: &'static [Self] = &[
        Self::GetMapping,
        Self::PostMapping,
        Self::PutMapping,
        Self::DeleteMapping,
        Self::PatchMapping,
        Self::RequestMapping,
        Self::ResponseBody,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::GetMapping => "GetMapping",
            Self::PostMapping => "PostMapping",
            Self::PutMapping => "PutMapping",
            Self::DeleteMapping => "DeleteMapping",
            Self::PatchMapping => "PatchMapping",
            Self::RequestMapping => "RequestMapping",
            Self::ResponseBody => "ResponseBody",
        }
    }
}

/// Maps an annotation onto the vocabulary `I`: the as-written name must equal
/// an indicator, or, for a dotted name, the segment after the last dot must.
pub fn match_annotation<I: Indicator>(annotation: &Annotation) -> Option<I> {
    let name = annotation.name.as_str();
    if let Some(hit) = I::from_name(name) {
        return Some(hit);
    }
    let (_, simple) = name.rsplit_once('.')?;
    I::from_name(simple)
}

pub fn annotation_name_matches<I: Indicator>(annotation: &Annotation, indicators: &[I]) -> bool {
    match_annotation::<I>(annotation).is_some_and(|hit| indicators.contains(&hit))
}

pub fn has_any_annotation<I: Indicator>(annotations: &[Annotation], indicators: &[I]) -> bool {
    annotations
        .iter()
        .any(|a| annotation_name_matches(a, indicators))
}

pub fn is_endpoint(method: &MethodDeclaration) -> bool {
    has_any_annotation(&method.annotations, EndpointIndicator::ALL)
}

/// A `@Service` alone is not enough: such a type only counts when it exposes
/// at least one endpoint method.
pub fn is_controller_type(decl: &DeclaredType) -> bool {
    let mut matched = decl
        .annotations
        .iter()
        .filter_map(match_annotation::<ControllerIndicator>)
        .peekable();

    if matched.peek().is_none() {
        return false;
    }
    if matched.all(|i| i == ControllerIndicator::Service) {
        return decl.methods.iter().any(is_endpoint);
    }
    true
}
