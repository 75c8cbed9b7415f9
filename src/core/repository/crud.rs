use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

use k8s_openapi::NamespaceResourceScope;
use kube::api::{Api, DeleteParams, ListParams, PostParams};
use kube::{Client, Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::core::repository::informer::InformerBuilder;
use crate::errors::{is_already_exists, is_version_conflict, Error, Result};

/// Read-mutate-write cycles `update_with` runs before giving up on a
/// conflicted resource.
const MUTATE_ATTEMPTS: u32 = 3;

/// A namespace-scoped CRUD repository over one resource kind.
///
/// Holds only the shared client handle and a default namespace, so cloning is
/// cheap and instances are safe for concurrent use. Every operation comes in
/// two forms: the bare name targets the default namespace, the `_in` variant
/// takes an explicit one.
pub struct CrudRepository<K> {
    client: Client,
    default_namespace: String,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Clone for CrudRepository<K> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            default_namespace: self.default_namespace.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K> CrudRepository<K>
where
    K: Resource<Scope = NamespaceResourceScope>
        + Clone
        + Serialize
        + DeserializeOwned
        + Debug
        + Send
        + Sync
        + 'static,
    K::DynamicType: Default + Eq + Hash + Clone,
{
    pub fn new(client: Client, default_namespace: impl Into<String>) -> Self {
        Self {
            client,
            default_namespace: default_namespace.into(),
            _kind: PhantomData,
        }
    }

    /// The namespace used by the bare operation variants.
    pub fn default_namespace(&self) -> &str {
        &self.default_namespace
    }

    /// The shared client handle.
    pub fn client(&self) -> &Client {
        &self.client
    }

    fn api(&self, namespace: &str) -> Api<K> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn kind() -> String {
        K::kind(&K::DynamicType::default()).into_owned()
    }

    /// Creates the resource in the default namespace.
    pub async fn create(&self, resource: &K) -> Result<K> {
        self.create_in(&self.default_namespace, resource).await
    }

    /// Creates the resource. Fails with [`Error::AlreadyExists`] if the
    /// (namespace, name) identity is already taken.
    pub async fn create_in(&self, namespace: &str, resource: &K) -> Result<K> {
        let name = resource.name_any();
        let created = self
            .api(namespace)
            .create(&PostParams::default(), resource)
            .await
            .map_err(|err| {
                if is_already_exists(&err) {
                    Error::AlreadyExists {
                        namespace: namespace.into(),
                        name: name.clone(),
                    }
                } else {
                    Error::Api(err)
                }
            })?;

        debug!("Created {} {}/{}", Self::kind(), namespace, name);
        Ok(created)
    }

    /// Upserts the resource in the default namespace.
    pub async fn update(&self, resource: &K) -> Result<K> {
        self.update_in(&self.default_namespace, resource).await
    }

    /// Unconditional upsert: creates the resource if absent, otherwise
    /// overwrites the full server-side object. Last writer wins; no version
    /// check is performed. Use [`Self::update_with_in`] when concurrent
    /// writers must be detected.
    pub async fn update_in(&self, namespace: &str, resource: &K) -> Result<K> {
        let api = self.api(namespace);
        let mut desired = resource.clone();
        // cleared so the replace below is an unconditional PUT
        desired.meta_mut().resource_version = None;

        match api.create(&PostParams::default(), &desired).await {
            Ok(created) => {
                debug!(
                    "Created {} {}/{} via upsert",
                    Self::kind(),
                    namespace,
                    created.name_any()
                );
                Ok(created)
            }
            Err(err) if is_already_exists(&err) => {
                let name = named(namespace, &desired)?;
                let replaced = api.replace(&name, &PostParams::default(), &desired).await?;
                debug!("Replaced {} {}/{}", Self::kind(), namespace, name);
                Ok(replaced)
            }
            Err(err) => Err(Error::Api(err)),
        }
    }

    /// Read-mutate-write against the default namespace.
    pub async fn update_with<F>(&self, name: &str, mutator: F) -> Result<K>
    where
        F: FnMut(&mut K),
    {
        self.update_with_in(&self.default_namespace, name, mutator)
            .await
    }

    /// Reads the resource, applies `mutator` in place, and writes it back.
    ///
    /// The resourceVersion from the read rides the write, so a third-party
    /// write in between is rejected by the API server; the whole cycle is then
    /// retried with a fresh read. Fails with [`Error::NotFound`] when the
    /// resource does not exist (no write attempted) and with
    /// [`Error::ConcurrentModification`] once the retry budget is exhausted.
    pub async fn update_with_in<F>(&self, namespace: &str, name: &str, mut mutator: F) -> Result<K>
    where
        F: FnMut(&mut K),
    {
        let api = self.api(namespace);

        for attempt in 1..=MUTATE_ATTEMPTS {
            let Some(mut current) = api.get_opt(name).await? else {
                return Err(Error::NotFound {
                    namespace: namespace.into(),
                    name: name.into(),
                });
            };

            mutator(&mut current);

            match api.replace(name, &PostParams::default(), &current).await {
                Ok(updated) => {
                    debug!("Updated {} {}/{}", Self::kind(), namespace, name);
                    return Ok(updated);
                }
                Err(err) if is_version_conflict(&err) => {
                    debug!(
                        "Conflict updating {} {}/{} (attempt {}), retrying",
                        Self::kind(),
                        namespace,
                        name,
                        attempt
                    );
                }
                Err(err) => return Err(Error::Api(err)),
            }
        }

        Err(Error::ConcurrentModification {
            namespace: namespace.into(),
            name: name.into(),
            attempts: MUTATE_ATTEMPTS,
        })
    }

    /// Fetches a resource from the default namespace.
    pub async fn get(&self, name: &str) -> Result<Option<K>> {
        self.get_in(&self.default_namespace, name).await
    }

    /// Fetches a resource; absence is `Ok(None)`, not an error.
    pub async fn get_in(&self, namespace: &str, name: &str) -> Result<Option<K>> {
        let resource = self.api(namespace).get_opt(name).await?;
        debug!("Fetched {} {}/{}", Self::kind(), namespace, name);
        Ok(resource)
    }

    /// Lists all resources of the kind in the default namespace.
    pub async fn list(&self) -> Result<Vec<K>> {
        self.list_in(&self.default_namespace).await
    }

    /// Lists all resources of the kind in the namespace. Ordering is whatever
    /// the API server returns.
    pub async fn list_in(&self, namespace: &str) -> Result<Vec<K>> {
        let list = self.api(namespace).list(&ListParams::default()).await?;
        debug!(
            "Listed {} {}(s) in namespace '{}'",
            list.items.len(),
            Self::kind(),
            namespace
        );
        Ok(list.items)
    }

    /// Deletes a resource from the default namespace.
    pub async fn delete(&self, name: &str) -> Result<()> {
        self.delete_in(&self.default_namespace, name).await
    }

    /// Deletes a resource by name. Whether deleting an absent resource errors
    /// is the API server's call; its 404 surfaces as [`Error::Api`].
    pub async fn delete_in(&self, namespace: &str, name: &str) -> Result<()> {
        self.api(namespace)
            .delete(name, &DeleteParams::default())
            .await?;
        debug!("Deleted {} {}/{}", Self::kind(), namespace, name);
        Ok(())
    }

    /// Starts configuring a change subscription in the default namespace.
    pub fn informer(&self) -> InformerBuilder<K> {
        self.informer_in(&self.default_namespace)
    }

    /// Starts configuring a change subscription for an explicit namespace.
    pub fn informer_in(&self, namespace: &str) -> InformerBuilder<K> {
        InformerBuilder::new(self.api(namespace), namespace)
    }
}

fn named<K: Resource>(namespace: &str, resource: &K) -> Result<String> {
    resource.meta().name.clone().ok_or_else(|| {
        Error::Configuration(format!(
            "resource in namespace '{namespace}' has no metadata.name"
        ))
    })
}
