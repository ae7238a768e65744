//! Card rendering.  The carousel treats a card as a black box: it hands the
//! renderer an item and a rectangle and never looks inside.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};

use crate::core::testimonial::{Testimonial, MAX_RATING};

use super::theme::Theme;

/// Draws one item into a slot.
pub trait CardRenderer<T> {
    fn render_card(&self, item: &T, area: Rect, buf: &mut Buffer);
}

/// Bordered testimonial card: author in the title, stars, wrapped quote,
/// and the booked service along the bottom border.
#[derive(Debug, Default, Clone, Copy)]
pub struct TestimonialCard;

impl TestimonialCard {
    fn stars(rating: u8) -> String {
        let filled = usize::from(rating.min(MAX_RATING));
        let empty = usize::from(MAX_RATING) - filled;
        format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
    }
}

impl CardRenderer<Testimonial> for TestimonialCard {
    fn render_card(&self, item: &Testimonial, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height < 3 {
            return;
        }

        let mut block = Block::default()
            .title(Span::styled(format!(" {} ", item.author), Theme::card_title_style()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::card_border_style());
        if let Some(service) = &item.service {
            block = block.title_bottom(
                Line::from(Span::styled(format!(" {service} "), Theme::card_footer_style()))
                    .right_aligned(),
            );
        }

        let mut lines = Vec::new();
        if let Some(rating) = item.rating {
            lines.push(Line::from(Span::styled(Self::stars(rating), Theme::rating_style())));
            lines.push(Line::raw(""));
        }
        lines.push(Line::from(Span::styled(
            format!("“{}”", item.message),
            Theme::quote_style(),
        )));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testimonial::TestimonialId;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn card_shows_author_rating_and_quote() {
        let item = Testimonial {
            id: TestimonialId::Number(1),
            author: "Ada".into(),
            service: Some("Fade".into()),
            message: "Sharp".into(),
            rating: Some(4),
        };
        let area = Rect::new(0, 0, 24, 6);
        let mut buf = Buffer::empty(area);
        TestimonialCard.render_card(&item, area, &mut buf);

        assert!(row(&buf, 0).contains("Ada"));
        assert!(row(&buf, 1).contains("★★★★☆"));
        assert!(row(&buf, 3).contains("Sharp"));
        assert!(row(&buf, 5).contains("Fade"));
    }

    #[test]
    fn tiny_slots_are_left_blank() {
        let item = Testimonial {
            id: TestimonialId::Number(1),
            author: "Ada".into(),
            service: None,
            message: "Sharp".into(),
            rating: None,
        };
        let area = Rect::new(0, 0, 3, 2);
        let mut buf = Buffer::empty(area);
        TestimonialCard.render_card(&item, area, &mut buf);
        assert_eq!(buf, Buffer::empty(area));
    }
}
