//! Per-variant banner layouts.
//!
//! [`render`] turns a [`BannerConfig`] plus the current [`VisibilityState`]
//! into a [`BannerView`]: a small structural tree (anchor, motion, density,
//! nodes) that tests can inspect and [`BannerView::to_html`] can serialize.
//! Each variant has exactly one layout function, picked by [`renderer_for`].

use serde::Serialize;

use crate::banner::{BannerConfig, ColorScheme, Variant};
use crate::visibility::VisibilityState;

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

/// Where on screen the banner is pinned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    Top,
    Bottom,
    BottomRight,
    BottomLeft,
    LeftCenter,
    Viewport,
}

/// Entrance/exit transition. Hidden slide variants sit at the motion's
/// start position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Motion {
    SlideDown,
    SlideUp,
    SlideRight,
    Fade,
    None,
}

/// Presentation density. Only `smart-header` switches between
/// expanded and compact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Density {
    Regular,
    Expanded,
    Compact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconSize {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ButtonWidth {
    Auto,
    Full,
}

/// Structural role of a container node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupRole {
    /// Horizontal single line.
    Row,
    /// Vertical text stack.
    Stack,
    /// Button cluster.
    Actions,
    /// Boxed content with its own corner dismiss.
    Card,
    /// Dimmed full-viewport overlay.
    Backdrop,
    /// Hover panel attached to the floating button.
    Tooltip,
    /// The floating pill itself.
    Pill,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Node {
    Group { role: GroupRole, children: Vec<Node> },
    Icon { size: IconSize },
    Title { text: String },
    Description { text: String },
    CtaButton { label: String, width: ButtonWidth },
    PhoneLink { number: String, href: String, width: ButtonWidth },
    DismissButton,
}

/// A rendered banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerView {
    pub banner_id: i64,
    pub variant: Variant,
    pub anchor: Anchor,
    pub motion: Motion,
    pub density: Density,
    /// False while a slide variant is mounted off-screen.
    pub shown: bool,
    pub colors: ColorScheme,
    pub nodes: Vec<Node>,
}

impl BannerView {
    /// Every node in document order, depth first.
    pub fn descendants(&self) -> Vec<&Node> {
        fn collect<'a>(nodes: &'a [Node], out: &mut Vec<&'a Node>) {
            for node in nodes {
                out.push(node);
                if let Node::Group { children, .. } = node {
                    collect(children, out);
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.nodes, &mut out);
        out
    }

    pub fn has_dismiss(&self) -> bool {
        self.descendants()
            .iter()
            .any(|n| matches!(n, Node::DismissButton))
    }

    pub fn has_phone(&self) -> bool {
        self.descendants()
            .iter()
            .any(|n| matches!(n, Node::PhoneLink { .. }))
    }

    pub fn has_description(&self) -> bool {
        self.descendants()
            .iter()
            .any(|n| matches!(n, Node::Description { .. }))
    }

    pub fn icon_size(&self) -> Option<IconSize> {
        self.descendants().iter().find_map(|n| match n {
            Node::Icon { size } => Some(*size),
            _ => None,
        })
    }

    pub fn has_group(&self, role: GroupRole) -> bool {
        self.descendants()
            .iter()
            .any(|n| matches!(n, Node::Group { role: r, .. } if *r == role))
    }

    /// Serialize to an HTML fragment. All text and attributes are escaped.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        let state_class = if self.shown {
            "cta-shown".to_string()
        } else {
            format!("cta-hidden cta-from-{}", motion_name(self.motion))
        };
        html.push_str(&format!(
            r#"<div class="cta-banner cta-{variant} cta-anchor-{anchor} cta-density-{density} cta-bg-{bg} cta-text-{fg} {state_class}" data-banner-id="{id}" data-variant="{variant}" role="region" aria-hidden="{hidden}">"#,
            variant = self.variant.as_str(),
            anchor = anchor_name(self.anchor),
            density = density_name(self.density),
            bg = self.colors.background.name(),
            fg = self.colors.text.name(),
            id = self.banner_id,
            hidden = !self.shown,
        ));
        for node in &self.nodes {
            write_node(&mut html, node, &self.colors);
        }
        html.push_str("</div>");
        html
    }
}

fn write_node(html: &mut String, node: &Node, colors: &ColorScheme) {
    match node {
        Node::Group { role, children } => {
            html.push_str(&format!(r#"<div class="cta-{}">"#, group_name(*role)));
            for child in children {
                write_node(html, child, colors);
            }
            html.push_str("</div>");
        }
        Node::Icon { size } => {
            html.push_str(&format!(
                r#"<span class="cta-icon cta-icon-{}" aria-hidden="true"></span>"#,
                icon_name(*size)
            ));
        }
        Node::Title { text } => {
            html.push_str(&format!(r#"<strong class="cta-title">{}</strong>"#, escape(text)));
        }
        Node::Description { text } => {
            html.push_str(&format!(r#"<p class="cta-description">{}</p>"#, escape(text)));
        }
        Node::CtaButton { label, width } => {
            html.push_str(&format!(
                r#"<button type="button" class="cta-button cta-btn-bg-{} cta-btn-text-{}{}" data-action="cta">{}</button>"#,
                colors.button_background.name(),
                colors.button_text.name(),
                width_class(*width),
                escape(label)
            ));
        }
        Node::PhoneLink {
            number,
            href,
            width,
        } => {
            html.push_str(&format!(
                r#"<a class="cta-phone{}" href="{}" data-action="phone">{}</a>"#,
                width_class(*width),
                escape(href),
                escape(number)
            ));
        }
        Node::DismissButton => {
            html.push_str(
                r#"<button type="button" class="cta-dismiss" data-action="dismiss" aria-label="Dismiss">&times;</button>"#,
            );
        }
    }
}

fn anchor_name(anchor: Anchor) -> &'static str {
    match anchor {
        Anchor::Top => "top",
        Anchor::Bottom => "bottom",
        Anchor::BottomRight => "bottom-right",
        Anchor::BottomLeft => "bottom-left",
        Anchor::LeftCenter => "left-center",
        Anchor::Viewport => "viewport",
    }
}

fn motion_name(motion: Motion) -> &'static str {
    match motion {
        Motion::SlideDown => "top",
        Motion::SlideUp => "bottom",
        Motion::SlideRight => "left",
        Motion::Fade | Motion::None => "none",
    }
}

fn density_name(density: Density) -> &'static str {
    match density {
        Density::Regular => "regular",
        Density::Expanded => "expanded",
        Density::Compact => "compact",
    }
}

fn icon_name(size: IconSize) -> &'static str {
    match size {
        IconSize::Small => "sm",
        IconSize::Medium => "md",
        IconSize::Large => "lg",
    }
}

fn group_name(role: GroupRole) -> &'static str {
    match role {
        GroupRole::Row => "row",
        GroupRole::Stack => "stack",
        GroupRole::Actions => "actions",
        GroupRole::Card => "card",
        GroupRole::Backdrop => "backdrop",
        GroupRole::Tooltip => "tooltip",
        GroupRole::Pill => "pill",
    }
}

fn width_class(width: ButtonWidth) -> &'static str {
    match width {
        ButtonWidth::Auto => "",
        ButtonWidth::Full => " cta-full",
    }
}

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Build a `tel:` href from a display number, keeping digits and a leading `+`.
pub fn phone_href(number: &str) -> String {
    let trimmed = number.trim();
    let mut href = String::from("tel:");
    if trimmed.starts_with('+') {
        href.push('+');
    }
    href.extend(trimmed.chars().filter(char::is_ascii_digit));
    href
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Content shared by every layout, already resolved from the config.
struct Parts<'a> {
    title: &'a str,
    description: &'a str,
    label: &'a str,
    phone: Option<&'a str>,
    dismissible: bool,
}

impl Parts<'_> {
    fn title(&self) -> Node {
        Node::Title {
            text: self.title.to_string(),
        }
    }

    fn description(&self) -> Option<Node> {
        (!self.description.trim().is_empty()).then(|| Node::Description {
            text: self.description.to_string(),
        })
    }

    fn cta(&self, width: ButtonWidth) -> Node {
        Node::CtaButton {
            label: self.label.to_string(),
            width,
        }
    }

    fn phone(&self, width: ButtonWidth) -> Option<Node> {
        self.phone.map(|number| Node::PhoneLink {
            number: number.to_string(),
            href: phone_href(number),
            width,
        })
    }

    fn dismiss(&self) -> Option<Node> {
        self.dismissible.then_some(Node::DismissButton)
    }
}

fn icon(size: IconSize) -> Node {
    Node::Icon { size }
}

fn group(role: GroupRole, children: impl IntoIterator<Item = Option<Node>>) -> Node {
    Node::Group {
        role,
        children: children.into_iter().flatten().collect(),
    }
}

/// Output of a layout function.
struct Layout {
    anchor: Anchor,
    motion: Motion,
    density: Density,
    nodes: Vec<Node>,
}

type RenderFn = fn(&Parts<'_>, VisibilityState) -> Layout;

/// The single variant → layout table.
fn renderer_for(variant: Variant) -> RenderFn {
    match variant {
        Variant::StickyTop => render_sticky_top,
        Variant::FloatingButton => render_floating_button,
        Variant::SlideBottom => render_slide_bottom,
        Variant::SmartHeader => render_smart_header,
        Variant::BannerStrip => render_banner_strip,
        Variant::CornerPopup => render_corner_popup,
        Variant::FullScreenTakeover => render_full_screen_takeover,
        Variant::SlideInLeft => render_slide_in_left,
        Variant::StickyBottom => render_sticky_bottom,
        Variant::NotificationBar => render_notification_bar,
    }
}

/// Render `config` for the given visibility state.
///
/// Returns `None` for an unknown variant, a dismissed banner, or a hidden
/// banner whose layout does not stay mounted.
pub fn render(config: &BannerConfig, state: VisibilityState) -> Option<BannerView> {
    let variant = config.variant()?;
    if state.dismissed || (!state.visible && !variant.stays_mounted_when_hidden()) {
        return None;
    }

    let parts = Parts {
        title: &config.title,
        description: &config.description,
        label: config.button_label(),
        phone: config.phone(),
        dismissible: config.dismissible,
    };
    let layout = renderer_for(variant)(&parts, state);

    Some(BannerView {
        banner_id: config.id,
        variant,
        anchor: layout.anchor,
        motion: layout.motion,
        density: layout.density,
        shown: state.visible,
        colors: config.colors,
        nodes: layout.nodes,
    })
}

/// Full-width bar content shared by the top and bottom slide bars.
fn full_bar(p: &Parts<'_>) -> Vec<Node> {
    vec![group(
        GroupRole::Row,
        [
            Some(icon(IconSize::Medium)),
            Some(group(GroupRole::Stack, [Some(p.title()), p.description()])),
            Some(group(
                GroupRole::Actions,
                [Some(p.cta(ButtonWidth::Auto)), p.phone(ButtonWidth::Auto)],
            )),
            p.dismiss(),
        ],
    )]
}

fn render_sticky_top(p: &Parts<'_>, _state: VisibilityState) -> Layout {
    Layout {
        anchor: Anchor::Top,
        motion: Motion::SlideDown,
        density: Density::Regular,
        nodes: full_bar(p),
    }
}

fn render_slide_bottom(p: &Parts<'_>, _state: VisibilityState) -> Layout {
    Layout {
        anchor: Anchor::Bottom,
        motion: Motion::SlideUp,
        density: Density::Regular,
        nodes: full_bar(p),
    }
}

fn render_floating_button(p: &Parts<'_>, _state: VisibilityState) -> Layout {
    let tooltip = group(
        GroupRole::Tooltip,
        [Some(p.title()), p.phone(ButtonWidth::Auto)],
    );
    let pill = group(
        GroupRole::Pill,
        [Some(p.cta(ButtonWidth::Auto)), p.dismiss()],
    );
    Layout {
        anchor: Anchor::BottomRight,
        motion: Motion::Fade,
        density: Density::Regular,
        nodes: vec![tooltip, pill],
    }
}

fn render_smart_header(p: &Parts<'_>, state: VisibilityState) -> Layout {
    let (density, row) = if state.scrolled {
        (
            Density::Compact,
            group(
                GroupRole::Row,
                [
                    Some(p.title()),
                    Some(group(
                        GroupRole::Actions,
                        [Some(p.cta(ButtonWidth::Auto)), p.phone(ButtonWidth::Auto)],
                    )),
                    p.dismiss(),
                ],
            ),
        )
    } else {
        (
            Density::Expanded,
            group(
                GroupRole::Row,
                [
                    Some(icon(IconSize::Medium)),
                    Some(group(GroupRole::Stack, [Some(p.title()), p.description()])),
                    Some(group(
                        GroupRole::Actions,
                        [Some(p.cta(ButtonWidth::Auto)), p.phone(ButtonWidth::Auto)],
                    )),
                    p.dismiss(),
                ],
            ),
        )
    };
    Layout {
        anchor: Anchor::Top,
        motion: Motion::None,
        density,
        nodes: vec![row],
    }
}

fn render_banner_strip(p: &Parts<'_>, _state: VisibilityState) -> Layout {
    Layout {
        anchor: Anchor::Top,
        motion: Motion::None,
        density: Density::Regular,
        nodes: vec![group(
            GroupRole::Row,
            [
                Some(icon(IconSize::Small)),
                Some(p.title()),
                Some(p.cta(ButtonWidth::Auto)),
                p.dismiss(),
            ],
        )],
    }
}

fn render_corner_popup(p: &Parts<'_>, _state: VisibilityState) -> Layout {
    let card = group(
        GroupRole::Card,
        [
            p.dismiss(),
            Some(icon(IconSize::Medium)),
            Some(p.title()),
            p.description(),
            Some(group(
                GroupRole::Stack,
                [Some(p.cta(ButtonWidth::Full)), p.phone(ButtonWidth::Full)],
            )),
        ],
    );
    Layout {
        anchor: Anchor::BottomLeft,
        motion: Motion::Fade,
        density: Density::Regular,
        nodes: vec![card],
    }
}

fn render_full_screen_takeover(p: &Parts<'_>, _state: VisibilityState) -> Layout {
    let card = group(
        GroupRole::Card,
        [
            p.dismiss(),
            Some(icon(IconSize::Large)),
            Some(p.title()),
            p.description(),
            Some(group(
                GroupRole::Actions,
                [Some(p.cta(ButtonWidth::Auto)), p.phone(ButtonWidth::Auto)],
            )),
        ],
    );
    Layout {
        anchor: Anchor::Viewport,
        motion: Motion::Fade,
        density: Density::Regular,
        nodes: vec![group(GroupRole::Backdrop, [Some(card)])],
    }
}

fn render_slide_in_left(p: &Parts<'_>, _state: VisibilityState) -> Layout {
    let card = group(
        GroupRole::Card,
        [
            p.dismiss(),
            Some(group(
                GroupRole::Row,
                [Some(icon(IconSize::Small)), Some(p.title())],
            )),
            p.description(),
            Some(p.cta(ButtonWidth::Full)),
        ],
    );
    Layout {
        anchor: Anchor::LeftCenter,
        motion: Motion::SlideRight,
        density: Density::Regular,
        nodes: vec![card],
    }
}

fn render_sticky_bottom(p: &Parts<'_>, _state: VisibilityState) -> Layout {
    Layout {
        anchor: Anchor::Bottom,
        motion: Motion::SlideUp,
        density: Density::Regular,
        nodes: vec![group(
            GroupRole::Row,
            [
                Some(group(GroupRole::Stack, [Some(p.title()), p.description()])),
                Some(group(
                    GroupRole::Actions,
                    [Some(p.cta(ButtonWidth::Auto)), p.phone(ButtonWidth::Auto)],
                )),
                p.dismiss(),
            ],
        )],
    }
}

fn render_notification_bar(p: &Parts<'_>, _state: VisibilityState) -> Layout {
    Layout {
        anchor: Anchor::Top,
        motion: Motion::None,
        density: Density::Regular,
        nodes: vec![group(
            GroupRole::Row,
            [Some(p.title()), Some(p.cta(ButtonWidth::Auto)), p.dismiss()],
        )],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
