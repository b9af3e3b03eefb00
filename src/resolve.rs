//! Endpoint discovery for controller types.
//!
//! Endpoints come from two places: methods declared on the controller itself
//! and methods of interfaces it directly implements. Only one level of
//! `implements` is followed; superclasses are never visited.

use log::debug;

use crate::catalog::InterfaceCatalog;
use crate::classify::{is_controller_type, is_endpoint};
use crate::inventory::{ControllerInfo, EndpointInfo, EndpointOrigin};
use crate::model::{DeclaredType, MethodDeclaration, SourceUnit};

pub fn resolve_unit(unit: &SourceUnit, catalog: &InterfaceCatalog) -> Vec<ControllerInfo> {
    let prefix = unit.package_prefix();
    unit.types
        .iter()
        .filter_map(|decl| resolve_controller(decl, &prefix, catalog))
        .collect()
}

pub fn resolve_controller(
    decl: &DeclaredType,
    package_prefix: &str,
    catalog: &InterfaceCatalog,
) -> Option<ControllerInfo> {
    if !is_controller_type(decl) {
        return None;
    }

    let mut controller = ControllerInfo::new(format!("{package_prefix}{}", decl.name));

    for method in decl.methods.iter().filter(|m| is_endpoint(m)) {
        controller.add_endpoint(declared_endpoint(method));
    }

    for reference in &decl.implemented {
        let Some(interface) = catalog.resolve(reference) else {
            debug!(
                "{}: interface {} not found, skipping",
                controller.qualified_name(),
                reference.qualified_key()
            );
            continue;
        };

        for method in interface.methods.iter().filter(|m| is_endpoint(m)) {
            controller.add_endpoint(interface_endpoint(method, &interface.name));
        }
    }

    Some(controller)
}

/// Return type (unless `void`) plus every parameter type.
pub fn declared_endpoint(method: &MethodDeclaration) -> EndpointInfo {
    let mut endpoint = EndpointInfo::new(&method.name, EndpointOrigin::Declared);
    if !method.returns_void() {
        endpoint.add_dto(&method.return_type);
    }
    for parameter in &method.parameters {
        endpoint.add_dto(&parameter.type_expr);
    }
    endpoint
}

/// Return type only (unless `void`); parameters of interface methods never
/// contribute.
pub fn interface_endpoint(method: &MethodDeclaration, interface: &str) -> EndpointInfo {
    let mut endpoint = EndpointInfo::new(&method.name, EndpointOrigin::Interface(interface.to_string()));
    if !method.returns_void() {
        endpoint.add_dto(&method.return_type);
    }
    endpoint
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogBuilder;
    use crate::syntax::parse_source;
    use indoc::indoc;
    use std::path::Path;

    fn unit(source: &str) -> SourceUnit {
        parse_source(source, Path::new("T.java"), false).unwrap()
    }

    fn dtos(endpoint: &EndpointInfo) -> Vec<&str> {
        endpoint.dtos().collect()
    }

    #[test]
    fn void_return_is_not_a_dto() {
        let u = unit(indoc! {r#"
            @RestController
            class C {
                @PostMapping void create(RequestA a, RequestB b) {}
                @PutMapping ResponseC update(RequestA a, RequestB b) { return null; }
                @GetMapping RequestA same(RequestA a, RequestA b) { return null; }
                void helper(Ignored i) {}
            }
        "#});
        let controllers = resolve_unit(&u, &InterfaceCatalog::default());
        assert_eq!(controllers.len(), 1);

        let endpoints = controllers[0].endpoints();
        assert_eq!(endpoints.len(), 3);
        assert_eq!(endpoints[0].name(), "create");
        assert_eq!(dtos(&endpoints[0]), vec!["RequestA", "RequestB"]);
        assert_eq!(dtos(&endpoints[1]), vec!["RequestA", "RequestB", "ResponseC"]);
        assert_eq!(dtos(&endpoints[2]), vec!["RequestA"]);
        assert!(endpoints.iter().all(|e| *e.origin() == EndpointOrigin::Declared));
    }

    #[test]
    fn interface_endpoints_contribute_return_type_only() {
        let api = unit(indoc! {r#"
            package com.acme.api;
            public interface UserApi {
                @GetMapping ResponseD find(Long id, Filter f);
                @DeleteMapping void remove(Long id);
                Other notAnEndpoint(Long id);
            }
        "#});
        let web = unit(indoc! {r#"
            package com.acme.web;
            @RestController
            public class UserController implements UserApi, Missing {
                public ResponseD find(Long id, Filter f) { return null; }
                public void remove(Long id) {}
            }
        "#});

        let mut builder = CatalogBuilder::new();
        builder.register_unit(&api);
        builder.register_unit(&web);
        let catalog = builder.build();

        let controllers = resolve_unit(&web, &catalog);
        assert_eq!(controllers.len(), 1);
        let c = &controllers[0];
        assert_eq!(c.qualified_name(), "com.acme.web.UserController");

        let endpoints = c.endpoints();
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[0].name(), "find");
        assert_eq!(dtos(&endpoints[0]), vec!["ResponseD"]);
        assert_eq!(*endpoints[0].origin(), EndpointOrigin::Interface("UserApi".into()));
        assert_eq!(endpoints[1].name(), "remove");
        assert!(dtos(&endpoints[1]).is_empty());
    }

    #[test]
    fn interface_endpoints_follow_declared_ones() {
        let u = unit(indoc! {r#"
            interface Api { @GetMapping View get(); }
            @Controller
            class C implements Api {
                @GetMapping public View get() { return null; }
                @PostMapping public void post(Form f) {}
            }
        "#});
        let mut builder = CatalogBuilder::new();
        builder.register_unit(&u);
        let catalog = builder.build();

        let controllers = resolve_unit(&u, &catalog);
        let names: Vec<&str> = controllers[0].endpoints().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["get", "post", "get"]);
    }

    #[test]
    fn only_one_level_of_implements_is_followed() {
        let u = unit(indoc! {r#"
            interface Base { @GetMapping Deep deep(); }
            interface Api extends Base { @GetMapping Shallow shallow(); }
            @RestController class C implements Api {}
        "#});
        let mut builder = CatalogBuilder::new();
        builder.register_unit(&u);
        let catalog = builder.build();

        let controllers = resolve_unit(&u, &catalog);
        let names: Vec<&str> = controllers[0].endpoints().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["shallow"]);
    }

    #[test]
    fn non_controllers_are_skipped() {
        let u = unit(indoc! {r#"
            class Plain { @GetMapping User get() { return null; } }
            @Service class Logic { void run() {} }
        "#});
        assert!(resolve_unit(&u, &InterfaceCatalog::default()).is_empty());
    }
}
