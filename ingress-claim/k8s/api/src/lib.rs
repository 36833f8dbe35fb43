#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod annotations;

pub use self::annotations::IngressExt;
pub use k8s_openapi::api::{
    self,
    networking::v1::{
        HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressBackend, IngressRule,
        IngressServiceBackend, IngressSpec, ServiceBackendPort,
    },
};
pub use kube::{
    core::{admission, DynamicObject, ObjectMeta},
    Resource, ResourceExt,
};
