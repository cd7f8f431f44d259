// src/services/document_service.rs

use genpdf::{Element, elements, style};
use image::Luma;
use qrcode::QrCode;
use uuid::Uuid;

use crate::{common::error::AppError, db::InventoryRepository};

// Gera a guia de remissão de um traslado em PDF, com QR do identificador
// para o destino escanear na recepção.
#[derive(Clone)]
pub struct DocumentService {
    inventory_repo: InventoryRepository,
}

impl DocumentService {
    pub fn new(inventory_repo: InventoryRepository) -> Self {
        Self { inventory_repo }
    }

    pub async fn transfer_dispatch_note(
        &self,
        tenant_id: Uuid,
        transfer_id: Uuid,
    ) -> Result<Vec<u8>, AppError> {
        // 1. Busca os dados desnormalizados do traslado
        let data = self
            .inventory_repo
            .transfer_print_data(tenant_id, transfer_id)
            .await?
            .ok_or(AppError::NotFound("traslado"))?;

        // 2. Configura o PDF (a fonte vem da pasta 'fonts/')
        let font_family = genpdf::fonts::from_files("./fonts", "Roboto", None).map_err(|_| {
            AppError::InternalServerError(anyhow::anyhow!(
                "Fonte não encontrada na pasta ./fonts"
            ))
        })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Guía de Remisión {}", data.id));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(
            elements::Paragraph::new(data.tenant_name.clone())
                .styled(style::Style::new().bold().with_font_size(18)),
        );
        if let Some(ruc) = &data.tenant_ruc {
            doc.push(
                elements::Paragraph::new(format!("RUC: {}", ruc))
                    .styled(style::Style::new().with_font_size(10)),
            );
        }

        doc.push(elements::Break::new(1.5));

        doc.push(
            elements::Paragraph::new("GUÍA DE REMISIÓN")
                .styled(style::Style::new().bold().with_font_size(14)),
        );
        doc.push(elements::Paragraph::new(format!("Traslado: {}", data.id)));
        doc.push(elements::Paragraph::new(format!(
            "Fecha: {}",
            data.created_at.format("%d/%m/%Y %H:%M")
        )));
        doc.push(elements::Paragraph::new(format!(
            "Origen: {} ({})",
            data.origin_name, data.origin_abbreviation
        )));
        doc.push(elements::Paragraph::new(format!(
            "Destino: {} ({})",
            data.destination_name, data.destination_abbreviation
        )));

        doc.push(elements::Break::new(2));

        // --- TABELA ---
        let mut table = elements::TableLayout::new(vec![2, 4, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("Código").styled(style_bold))
            .element(elements::Paragraph::new("Producto").styled(style_bold))
            .element(elements::Paragraph::new("Enviado").styled(style_bold))
            .element(elements::Paragraph::new("Recibido").styled(style_bold))
            .push()
            .expect("Table error");

        let received = data
            .received_quantity
            .map(|q| q.to_string())
            .unwrap_or_else(|| "—".to_string());

        table
            .row()
            .element(elements::Paragraph::new(data.product_code.clone()))
            .element(elements::Paragraph::new(data.product_name.clone()))
            .element(elements::Paragraph::new(data.delivered_quantity.to_string()))
            .element(elements::Paragraph::new(received))
            .push()
            .expect("Table row error");

        doc.push(table);
        doc.push(elements::Break::new(1));

        doc.push(elements::Paragraph::new(format!(
            "Estado: {}",
            data.status.to_uppercase()
        )));

        doc.push(elements::Break::new(2));

        // --- QR ---
        // O destino escaneia o QR para abrir a confirmação do traslado certo.
        let code = QrCode::new(data.id.to_string().as_bytes())
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        let image_buffer = code.render::<Luma<u8>>().build();
        let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

        let pdf_image = genpdf::elements::Image::from_dynamic_image(dynamic_image)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?
            .with_scale(genpdf::Scale::new(0.5, 0.5));

        doc.push(pdf_image);

        // 3. Renderiza para buffer (memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        Ok(buffer)
    }
}
