// crates/metrics-discovery-core/src/interfaces/gateway.rs
// ============================================================================
// Module: Infrastructure Access Gateway
// Description: Capability-checked facade over bound query handles.
// Purpose: Fail fast on unknown or unbound capabilities.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! A [`Gateway`] holds the handles created for one authenticated session.
//! Handles are bound at construction; requesting a capability the gateway was
//! built without fails immediately with
//! [`DiscoveryError::CapabilityNotBound`]. An offline gateway binds nothing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use crate::core::error::DiscoveryError;
use crate::interfaces::Capability;
use crate::interfaces::ManagedDatabaseInventory;
use crate::interfaces::MetricsNamespaceListing;
use crate::interfaces::ObjectStorage;
use crate::interfaces::ResourceTagLookup;
use crate::interfaces::VirtualMachineInventory;

// ============================================================================
// SECTION: Handles
// ============================================================================

/// Bound capability handle returned by name lookups.
#[derive(Clone)]
pub enum CapabilityHandle {
    /// Object storage handle.
    ObjectStorage(Arc<dyn ObjectStorage>),
    /// Virtual machine inventory handle.
    VirtualMachineInventory(Arc<dyn VirtualMachineInventory>),
    /// Managed database inventory handle.
    ManagedDatabaseInventory(Arc<dyn ManagedDatabaseInventory>),
    /// Metrics listing handle.
    MetricsNamespaceListing(Arc<dyn MetricsNamespaceListing>),
    /// Resource tag lookup handle.
    ResourceTagLookup(Arc<dyn ResourceTagLookup>),
}

impl CapabilityHandle {
    /// Returns the capability the handle serves.
    #[must_use]
    pub const fn capability(&self) -> Capability {
        match self {
            Self::ObjectStorage(_) => Capability::ObjectStorage,
            Self::VirtualMachineInventory(_) => Capability::VirtualMachineInventory,
            Self::ManagedDatabaseInventory(_) => Capability::ManagedDatabaseInventory,
            Self::MetricsNamespaceListing(_) => Capability::MetricsNamespaceListing,
            Self::ResourceTagLookup(_) => Capability::ResourceTagLookup,
        }
    }
}

impl fmt::Debug for CapabilityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CapabilityHandle").field(&self.capability()).finish()
    }
}

// ============================================================================
// SECTION: Gateway
// ============================================================================

/// Capability facade bound to one session.
#[derive(Clone, Default)]
pub struct Gateway {
    /// Object storage handle.
    object_storage: Option<Arc<dyn ObjectStorage>>,
    /// Virtual machine inventory handle.
    virtual_machines: Option<Arc<dyn VirtualMachineInventory>>,
    /// Managed database inventory handle.
    databases: Option<Arc<dyn ManagedDatabaseInventory>>,
    /// Metrics listing handle.
    metrics: Option<Arc<dyn MetricsNamespaceListing>>,
    /// Resource tag lookup handle.
    tags: Option<Arc<dyn ResourceTagLookup>>,
}

impl Gateway {
    /// Creates a gateway without a session; every capability is unbound.
    #[must_use]
    pub fn offline() -> Self {
        Self::default()
    }

    /// Starts building a gateway from individual handles.
    #[must_use]
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::default()
    }

    /// Looks up a capability handle by name.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::UnsupportedCapability`] for unknown names and
    /// [`DiscoveryError::CapabilityNotBound`] for unbound capabilities.
    pub fn capability(&self, name: &str) -> Result<CapabilityHandle, DiscoveryError> {
        self.handle(name.parse()?)
    }

    /// Returns the handle bound for a capability.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::CapabilityNotBound`] when no handle is bound.
    pub fn handle(&self, capability: Capability) -> Result<CapabilityHandle, DiscoveryError> {
        let handle = match capability {
            Capability::ObjectStorage => {
                self.object_storage.clone().map(CapabilityHandle::ObjectStorage)
            }
            Capability::VirtualMachineInventory => {
                self.virtual_machines.clone().map(CapabilityHandle::VirtualMachineInventory)
            }
            Capability::ManagedDatabaseInventory => {
                self.databases.clone().map(CapabilityHandle::ManagedDatabaseInventory)
            }
            Capability::MetricsNamespaceListing => {
                self.metrics.clone().map(CapabilityHandle::MetricsNamespaceListing)
            }
            Capability::ResourceTagLookup => {
                self.tags.clone().map(CapabilityHandle::ResourceTagLookup)
            }
        };
        handle.ok_or(DiscoveryError::CapabilityNotBound(capability))
    }

    /// Returns true when a handle is bound for the capability.
    #[must_use]
    pub const fn is_bound(&self, capability: Capability) -> bool {
        match capability {
            Capability::ObjectStorage => self.object_storage.is_some(),
            Capability::VirtualMachineInventory => self.virtual_machines.is_some(),
            Capability::ManagedDatabaseInventory => self.databases.is_some(),
            Capability::MetricsNamespaceListing => self.metrics.is_some(),
            Capability::ResourceTagLookup => self.tags.is_some(),
        }
    }

    /// Fails unless every listed capability is bound.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::CapabilityNotBound`] for the first unbound
    /// capability.
    pub fn require(&self, capabilities: &[Capability]) -> Result<(), DiscoveryError> {
        match capabilities.iter().find(|capability| !self.is_bound(**capability)) {
            Some(capability) => Err(DiscoveryError::CapabilityNotBound(*capability)),
            None => Ok(()),
        }
    }

    /// Returns the object storage handle.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::CapabilityNotBound`] when unbound.
    pub fn object_storage(&self) -> Result<Arc<dyn ObjectStorage>, DiscoveryError> {
        self.object_storage
            .clone()
            .ok_or(DiscoveryError::CapabilityNotBound(Capability::ObjectStorage))
    }

    /// Returns the virtual machine inventory handle.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::CapabilityNotBound`] when unbound.
    pub fn virtual_machines(&self) -> Result<Arc<dyn VirtualMachineInventory>, DiscoveryError> {
        self.virtual_machines
            .clone()
            .ok_or(DiscoveryError::CapabilityNotBound(Capability::VirtualMachineInventory))
    }

    /// Returns the managed database inventory handle.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::CapabilityNotBound`] when unbound.
    pub fn databases(&self) -> Result<Arc<dyn ManagedDatabaseInventory>, DiscoveryError> {
        self.databases
            .clone()
            .ok_or(DiscoveryError::CapabilityNotBound(Capability::ManagedDatabaseInventory))
    }

    /// Returns the metrics listing handle.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::CapabilityNotBound`] when unbound.
    pub fn metrics(&self) -> Result<Arc<dyn MetricsNamespaceListing>, DiscoveryError> {
        self.metrics
            .clone()
            .ok_or(DiscoveryError::CapabilityNotBound(Capability::MetricsNamespaceListing))
    }

    /// Returns the resource tag lookup handle.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::CapabilityNotBound`] when unbound.
    pub fn tags(&self) -> Result<Arc<dyn ResourceTagLookup>, DiscoveryError> {
        self.tags.clone().ok_or(DiscoveryError::CapabilityNotBound(Capability::ResourceTagLookup))
    }
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound: Vec<&str> = Capability::ALL
            .into_iter()
            .filter(|capability| self.is_bound(*capability))
            .map(Capability::as_str)
            .collect();
        f.debug_struct("Gateway").field("bound", &bound).finish()
    }
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Builder binding individual capability handles.
#[derive(Default)]
pub struct GatewayBuilder {
    /// Gateway under construction.
    gateway: Gateway,
}

impl GatewayBuilder {
    /// Binds the object storage handle.
    #[must_use]
    pub fn object_storage(mut self, handle: Arc<dyn ObjectStorage>) -> Self {
        self.gateway.object_storage = Some(handle);
        self
    }

    /// Binds the virtual machine inventory handle.
    #[must_use]
    pub fn virtual_machines(mut self, handle: Arc<dyn VirtualMachineInventory>) -> Self {
        self.gateway.virtual_machines = Some(handle);
        self
    }

    /// Binds the managed database inventory handle.
    #[must_use]
    pub fn databases(mut self, handle: Arc<dyn ManagedDatabaseInventory>) -> Self {
        self.gateway.databases = Some(handle);
        self
    }

    /// Binds the metrics listing handle.
    #[must_use]
    pub fn metrics(mut self, handle: Arc<dyn MetricsNamespaceListing>) -> Self {
        self.gateway.metrics = Some(handle);
        self
    }

    /// Binds the resource tag lookup handle.
    #[must_use]
    pub fn tags(mut self, handle: Arc<dyn ResourceTagLookup>) -> Self {
        self.gateway.tags = Some(handle);
        self
    }

    /// Finishes the gateway.
    #[must_use]
    pub fn build(self) -> Gateway {
        self.gateway
    }
}
