//! Semantic validation of parsed WebIDL.
//!
//! The validator walks the tree in declaration order and collects
//! [`Diagnostic`]s. It never aborts: a single tree may yield many
//! diagnostics, each optionally carrying a deferred [`Fix`] the caller can
//! apply to the same tree.

pub mod autofix;
pub mod defs;
pub mod helpers;

pub use autofix::{apply, Fix};
pub use defs::{AnalysisCache, CacheState, Definitions};
pub use helpers::{
    dictionary_includes_required_field, idl_type_includes_dictionary, is_last_required_argument,
};

use serde::Serialize;
use tracing::trace;
use widl_parser::{first_token, Document, NodeData, NodeIndex};
use widl_scanner::error::{render_error, ConstructName, ErrorKind};
use widl_scanner::Token;

// =============================================================================
// Diagnostics
// =============================================================================

/// Stable identifiers for the validation rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    NoDuplicate,
    RequireExposed,
    ConstructorMember,
    NoConstructibleGlobal,
    IncompleteOp,
    NoCrossOverload,
    NoNullableUnionDict,
    NoNullableDictArg,
    DictArgOptional,
    DictArgDefault,
}

impl DiagnosticKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::NoDuplicate => "no-duplicate",
            DiagnosticKind::RequireExposed => "require-exposed",
            DiagnosticKind::ConstructorMember => "constructor-member",
            DiagnosticKind::NoConstructibleGlobal => "no-constructible-global",
            DiagnosticKind::IncompleteOp => "incomplete-op",
            DiagnosticKind::NoCrossOverload => "no-cross-overload",
            DiagnosticKind::NoNullableUnionDict => "no-nullable-union-dict",
            DiagnosticKind::NoNullableDictArg => "no-nullable-dict-arg",
            DiagnosticKind::DictArgOptional => "dict-arg-optional",
            DiagnosticKind::DictArgDefault => "dict-arg-default",
        }
    }
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation finding. Diagnostics are data; callers print or
/// transform them, and decide if and when to apply fixes.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Decorated message: context header plus the bare message.
    pub message: String,
    pub bare_message: String,
    /// Printable window around the bound token, caret included.
    pub context: String,
    pub line: u32,
    pub source_name: Option<String>,
    /// Deferred tree edit that resolves the finding, when one exists.
    #[serde(skip)]
    pub fix: Option<Fix>,
}

/// Validate a document, yielding diagnostics in tree-walk order.
#[must_use]
pub fn validate(document: &Document) -> Vec<Diagnostic> {
    let mut checker = Checker {
        document,
        defs: Definitions::build(document),
        diagnostics: Vec::new(),
    };
    checker.run();
    checker.diagnostics
}

// =============================================================================
// The walk
// =============================================================================

struct Checker<'a> {
    document: &'a Document,
    defs: Definitions,
    diagnostics: Vec<Diagnostic>,
}

impl Checker<'_> {
    fn run(&mut self) {
        for duplicate in self.defs.duplicates.clone() {
            let data = &self.document.arena[duplicate].data;
            let name = data.definition_name().unwrap_or_default().to_string();
            let kind_str = data.kind_str();
            let token = self.name_token(duplicate);
            self.diag(
                token,
                duplicate,
                DiagnosticKind::NoDuplicate,
                &format!("The name \"{name}\" of type \"{kind_str}\" was already seen"),
                None,
            );
        }
        for definition in self.document.definitions.clone() {
            self.validate_definition(definition);
        }
    }

    fn validate_definition(&mut self, index: NodeIndex) {
        self.validate_ext_attrs(index);
        match &self.document.arena[index].data {
            NodeData::Interface(_) => {
                self.check_interface(index);
                self.validate_members(index);
            }
            NodeData::Namespace(_) => {
                self.check_namespace(index);
                self.validate_members(index);
            }
            NodeData::Mixin(_) | NodeData::CallbackInterface(_) | NodeData::Dictionary(_) => {
                self.validate_members(index);
            }
            NodeData::Typedef(data) => {
                if let Some(idl_type) = data.idl_type {
                    self.validate_type(idl_type);
                }
            }
            NodeData::CallbackFunction(data) => {
                let (idl_type, arguments) = (data.idl_type, data.arguments.clone());
                if let Some(idl_type) = idl_type {
                    self.validate_type(idl_type);
                }
                self.validate_arguments(&arguments);
            }
            _ => {}
        }
    }

    fn validate_members(&mut self, container: NodeIndex) {
        let members = match &self.document.arena[container].data {
            NodeData::Interface(data)
            | NodeData::Mixin(data)
            | NodeData::CallbackInterface(data)
            | NodeData::Dictionary(data)
            | NodeData::Namespace(data) => data.members.clone(),
            _ => return,
        };
        for member in members {
            self.validate_member(member);
        }
    }

    fn validate_member(&mut self, index: NodeIndex) {
        self.validate_ext_attrs(index);
        match &self.document.arena[index].data {
            NodeData::Attribute(data) => {
                if let Some(idl_type) = data.idl_type {
                    self.validate_type(idl_type);
                }
            }
            NodeData::Operation(data) => {
                let (idl_type, arguments) = (data.idl_type, data.arguments.clone());
                self.check_operation(index);
                if let Some(idl_type) = idl_type {
                    self.validate_type(idl_type);
                }
                self.validate_arguments(&arguments);
            }
            NodeData::Constant(data) => {
                if let Some(idl_type) = data.idl_type {
                    self.validate_type(idl_type);
                }
            }
            NodeData::Constructor(data) => {
                let arguments = data.arguments.clone();
                self.validate_arguments(&arguments);
            }
            NodeData::IterableLike(data) => {
                let (idl_types, arguments) = (data.idl_types.clone(), data.arguments.clone());
                for idl_type in idl_types {
                    self.validate_type(idl_type);
                }
                self.validate_arguments(&arguments);
            }
            NodeData::Field(data) => {
                if let Some(idl_type) = data.idl_type {
                    self.validate_type(idl_type);
                }
            }
            _ => {}
        }
    }

    fn validate_arguments(&mut self, arguments: &[NodeIndex]) {
        for &argument in arguments {
            self.validate_ext_attrs(argument);
            let (idl_type, optional, has_default) =
                match &self.document.arena[argument].data {
                    NodeData::Argument(data) => {
                        (data.idl_type, data.optional(), data.default.is_some())
                    }
                    _ => continue,
                };
            let Some(idl_type) = idl_type else { continue };
            self.validate_type(idl_type);
            self.check_dictionary_argument(argument, idl_type, optional, has_default);
        }
    }

    fn validate_type(&mut self, index: NodeIndex) {
        self.validate_ext_attrs(index);
        let NodeData::Type(data) = &self.document.arena[index].data else {
            return;
        };
        let (union, nullable, subtypes) = (data.union, data.nullable(), data.subtypes.clone());
        let nullable_token = data.tokens.nullable.clone();
        for subtype in &subtypes {
            self.validate_type(*subtype);
        }
        if union && nullable {
            let includes =
                idl_type_includes_dictionary(self.document, &mut self.defs, index, true);
            if includes.is_some() {
                self.diag(
                    nullable_token,
                    index,
                    DiagnosticKind::NoNullableUnionDict,
                    "Nullable union cannot include a dictionary type.",
                    None,
                );
            }
        }
    }

    fn validate_ext_attrs(&mut self, owner: NodeIndex) {
        let Some(block) = self.document.arena[owner].data.ext_attrs() else {
            return;
        };
        let NodeData::ExtendedAttributes(data) = &self.document.arena[block].data else {
            return;
        };
        for item in data.items.clone() {
            let NodeData::ExtendedAttribute(attr) = &self.document.arena[item].data else {
                continue;
            };
            for argument in attr.arguments.clone() {
                let NodeData::Argument(arg) = &self.document.arena[argument].data else {
                    continue;
                };
                if let Some(idl_type) = arg.idl_type {
                    self.validate_type(idl_type);
                }
            }
        }
    }

    // =========================================================================
    // Interface rules
    // =========================================================================

    fn check_interface(&mut self, interface: NodeIndex) {
        let NodeData::Interface(data) = &self.document.arena[interface].data else {
            return;
        };
        let partial = data.partial();
        let name_token = data.tokens.name.clone();
        let members = data.members.clone();

        if !partial
            && self.find_ext_attr(interface, "Exposed").is_none()
            && self.find_ext_attr(interface, "NoInterfaceObject").is_none()
        {
            self.diag(
                name_token.clone(),
                interface,
                DiagnosticKind::RequireExposed,
                "Interfaces must have `[Exposed]` extended attribute. To fix, add, for example, `[Exposed=Window]`. Please also consider carefully if your interface should also be exposed in a Worker scope.",
                Some(Fix::AddExposedWindow {
                    definition: interface,
                }),
            );
        }

        for attribute in self.ext_attrs_named(interface, "Constructor") {
            let token = self.attr_name_token(attribute);
            self.diag(
                token,
                interface,
                DiagnosticKind::ConstructorMember,
                "Constructors should now be represented as a `constructor()` operation on the interface instead of `[Constructor]` extended attribute.",
                Some(Fix::ConstructorMember {
                    interface,
                    attribute,
                }),
            );
        }

        if self.find_ext_attr(interface, "Global").is_some() {
            for attribute in self.ext_attrs_named(interface, "LegacyFactoryFunction") {
                let token = self.attr_name_token(attribute);
                self.diag(
                    token,
                    interface,
                    DiagnosticKind::NoConstructibleGlobal,
                    "Interfaces marked as `[Global]` cannot have named constructors.",
                    None,
                );
            }
            for &member in &members {
                if let NodeData::Constructor(ctor) = &self.document.arena[member].data {
                    let token = ctor.tokens.base.clone();
                    self.diag(
                        token,
                        member,
                        DiagnosticKind::NoConstructibleGlobal,
                        "Interfaces marked as `[Global]` cannot have constructors.",
                        None,
                    );
                }
            }
        }

        if !partial {
            self.check_interface_member_duplication(interface);
        }
    }

    fn check_namespace(&mut self, namespace: NodeIndex) {
        let NodeData::Namespace(data) = &self.document.arena[namespace].data else {
            return;
        };
        let partial = data.partial();
        let name_token = data.tokens.name.clone();
        if !partial && self.find_ext_attr(namespace, "Exposed").is_none() {
            self.diag(
                name_token,
                namespace,
                DiagnosticKind::RequireExposed,
                "Namespaces must have `[Exposed]` extended attribute. To fix, add, for example, `[Exposed=Window]`.",
                Some(Fix::AddExposedWindow {
                    definition: namespace,
                }),
            );
        }
    }

    /// Operation names added by partials and included mixins must not
    /// collide with ones the base interface already defines.
    fn check_interface_member_duplication(&mut self, interface: NodeIndex) {
        let base_name = match &self.document.arena[interface].data {
            NodeData::Interface(data) => data.name().to_string(),
            _ => return,
        };
        let mut seen: Vec<String> = self
            .operations_of(interface)
            .into_iter()
            .filter_map(|op| self.operation_name(op))
            .collect();

        let mut extensions: Vec<NodeIndex> = self
            .defs
            .partials
            .get(&base_name)
            .cloned()
            .unwrap_or_default();
        for &include in &self.defs.includes.clone() {
            let NodeData::Includes(data) = &self.document.arena[include].data else {
                continue;
            };
            if data.target() != base_name {
                continue;
            }
            if let Some(&mixin) = self.defs.mixins.get(data.mixin()) {
                extensions.push(mixin);
            }
        }

        for extension in extensions {
            let additions = self.operations_of(extension);
            let mut added = Vec::new();
            for addition in additions {
                let Some(name) = self.operation_name(addition) else {
                    continue;
                };
                if seen.contains(&name) {
                    let token = self.name_token(addition);
                    self.diag(
                        token,
                        addition,
                        DiagnosticKind::NoCrossOverload,
                        &format!(
                            "The operation \"{name}\" has already been defined for the base interface \"{base_name}\" either in itself or in a mixin"
                        ),
                        None,
                    );
                }
                added.push(name);
            }
            seen.extend(added);
        }
    }

    fn check_operation(&mut self, operation: NodeIndex) {
        let NodeData::Operation(data) = &self.document.arena[operation].data else {
            return;
        };
        if data.name().is_empty() && matches!(data.special(), "" | "static") {
            let token = data.tokens.open.clone();
            if token.is_some() {
                self.diag(
                    token,
                    operation,
                    DiagnosticKind::IncompleteOp,
                    "Operations must have a name.",
                    None,
                );
            }
        }
    }

    // =========================================================================
    // Dictionary-argument rules
    // =========================================================================

    fn check_dictionary_argument(
        &mut self,
        argument: NodeIndex,
        idl_type: NodeIndex,
        optional: bool,
        has_default: bool,
    ) {
        let Some(inclusion) =
            idl_type_includes_dictionary(self.document, &mut self.defs, idl_type, true)
        else {
            return;
        };
        let nullable = matches!(
            &self.document.arena[idl_type].data,
            NodeData::Type(ty) if ty.nullable()
        );
        let name_token = self.name_token(argument);
        if nullable {
            self.diag(
                name_token,
                argument,
                DiagnosticKind::NoNullableDictArg,
                "Dictionary arguments cannot be nullable.",
                None,
            );
        } else if !optional {
            if is_last_required_argument(self.document, argument)
                && !dictionary_includes_required_field(
                    self.document,
                    &mut self.defs,
                    inclusion.dictionary,
                )
            {
                self.diag(
                    name_token,
                    argument,
                    DiagnosticKind::DictArgOptional,
                    "Dictionary argument must be optional if it has no required fields",
                    Some(Fix::OptionalDictionaryArgument { argument }),
                );
            }
        } else if !has_default {
            self.diag(
                name_token,
                argument,
                DiagnosticKind::DictArgDefault,
                "Optional dictionary arguments must have a default value of `{}`.",
                Some(Fix::DefaultDictionaryArgument { argument }),
            );
        }
    }

    // =========================================================================
    // Shared lookups and rendering
    // =========================================================================

    fn find_ext_attr(&self, owner: NodeIndex, name: &str) -> Option<NodeIndex> {
        self.ext_attrs_named(owner, name).into_iter().next()
    }

    fn ext_attrs_named(&self, owner: NodeIndex, name: &str) -> Vec<NodeIndex> {
        let Some(block) = self.document.arena[owner].data.ext_attrs() else {
            return Vec::new();
        };
        let NodeData::ExtendedAttributes(data) = &self.document.arena[block].data else {
            return Vec::new();
        };
        data.items
            .iter()
            .copied()
            .filter(|&item| {
                matches!(
                    &self.document.arena[item].data,
                    NodeData::ExtendedAttribute(attr) if attr.name() == name
                )
            })
            .collect()
    }

    fn attr_name_token(&self, attribute: NodeIndex) -> Option<Token> {
        match &self.document.arena[attribute].data {
            NodeData::ExtendedAttribute(data) => data.tokens.name.clone(),
            _ => None,
        }
    }

    fn operations_of(&self, container: NodeIndex) -> Vec<NodeIndex> {
        let members = match &self.document.arena[container].data {
            NodeData::Interface(data) | NodeData::Mixin(data) => &data.members,
            _ => return Vec::new(),
        };
        members
            .iter()
            .copied()
            .filter(|&m| matches!(&self.document.arena[m].data, NodeData::Operation(_)))
            .collect()
    }

    /// A non-empty operation name, or `None`.
    fn operation_name(&self, operation: NodeIndex) -> Option<String> {
        match &self.document.arena[operation].data {
            NodeData::Operation(data) if !data.name().is_empty() => {
                Some(data.name().to_string())
            }
            _ => None,
        }
    }

    fn name_token(&self, node: NodeIndex) -> Option<Token> {
        match &self.document.arena[node].data {
            NodeData::Interface(data)
            | NodeData::Mixin(data)
            | NodeData::CallbackInterface(data)
            | NodeData::Dictionary(data)
            | NodeData::Namespace(data) => data.tokens.name.clone(),
            NodeData::Enum(data) => data.tokens.name.clone(),
            NodeData::Typedef(data) => data.tokens.name.clone(),
            NodeData::CallbackFunction(data) => data.tokens.name.clone(),
            NodeData::Operation(data) => data.tokens.name.clone(),
            NodeData::Attribute(data) => data.tokens.name.clone(),
            NodeData::Argument(data) => data.tokens.name.clone(),
            NodeData::Field(data) => data.tokens.name.clone(),
            _ => None,
        }
    }

    /// The nearest enclosing named definition, for the message header.
    fn context_of(&self, node: NodeIndex) -> Option<(&'static str, String, bool)> {
        let mut cursor = Some(node);
        while let Some(index) = cursor {
            let data = &self.document.arena[index].data;
            if let Some(name) = data.definition_name() {
                return Some((data.kind_str(), name.to_string(), data.is_partial()));
            }
            cursor = self.document.arena[index].parent;
        }
        None
    }

    fn diag(
        &mut self,
        token: Option<Token>,
        node: NodeIndex,
        kind: DiagnosticKind,
        bare_message: &str,
        fix: Option<Fix>,
    ) {
        let position = token
            .as_ref()
            .map(|t| t.index as usize)
            .or_else(|| first_token(&self.document.arena, node).map(|t| t.index as usize))
            .unwrap_or_else(|| self.document.tokens.len().saturating_sub(1));
        let current = self.context_of(node);
        let construct = current.as_ref().map(|c| ConstructName {
            construct: c.0,
            name: &c.1,
            partial: c.2,
        });
        let rendered = render_error(
            &self.document.tokens,
            position,
            ErrorKind::Validation,
            self.document.source_name.as_deref(),
            construct,
            bare_message,
        );
        trace!(kind = kind.as_str(), line = rendered.line, "diagnostic");
        self.diagnostics.push(Diagnostic {
            kind,
            message: rendered.message,
            bare_message: bare_message.to_string(),
            context: rendered.context,
            line: rendered.line,
            source_name: self.document.source_name.clone(),
            fix,
        });
    }
}
